mod test_procedural_basic;
