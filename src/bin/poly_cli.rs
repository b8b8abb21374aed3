//! Native command-line tool: generate a polyhedron and dump it as OBJ or
//! print its statistics. Handy for eyeballing procedural output in any mesh
//! viewer without wiring up a renderer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;

use polystudio::{EdgeSet, PolyMesh, RandomParams, assemble};

const USAGE: &str = r#"poly_cli (polystudio)

USAGE:
  poly_cli gen <faces> [options]
  poly_cli info <faces> [options]

OPTIONS:
  --scale <r>        Circumsphere radius (default 1.5)
  --seed <n>         Seed the randomization for reproducible output
  --params <path>    JSON randomization bundle to reuse
  --obj <path>       Write the mesh as Wavefront OBJ (gen only)
  --overwrite        Overwrite an existing output file
  -h, --help         Show this help
"#;

fn main() {
    if let Err(err) = run() {
        eprintln!("poly_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut args = Args::new(args);

    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "gen" => cmd_generate(&mut args, true),
        "info" => cmd_generate(&mut args, false),
        "-h" | "--help" | "help" => {
            print_usage();
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
    }
}

fn print_usage() {
    println!("{USAGE}");
}

fn cmd_generate(args: &mut Args, allow_obj: bool) -> Result<(), String> {
    let faces: u32 = args
        .next()
        .ok_or("missing face count")?
        .parse()
        .map_err(|e| format!("invalid face count: {e}"))?;

    let mut scale = 1.5_f64;
    let mut seed: Option<u64> = None;
    let mut params_path: Option<PathBuf> = None;
    let mut obj_path: Option<PathBuf> = None;
    let mut overwrite = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scale" => {
                scale = args
                    .value("--scale")?
                    .parse()
                    .map_err(|e| format!("invalid scale: {e}"))?;
            }
            "--seed" => {
                seed = Some(
                    args.value("--seed")?
                        .parse()
                        .map_err(|e| format!("invalid seed: {e}"))?,
                );
            }
            "--params" => params_path = Some(PathBuf::from(args.value("--params")?)),
            "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
            "--overwrite" => overwrite = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
        }
    }

    if obj_path.is_some() && !allow_obj {
        return Err("--obj is only valid with `gen`".to_string());
    }
    if !(scale.is_finite() && scale > 0.0) {
        return Err(format!("scale must be a positive finite number, got {scale}"));
    }

    let params = match params_path {
        Some(path) => {
            let text =
                fs::read_to_string(&path).map_err(|e| format!("read {}: {e}", path.display()))?;
            let params: RandomParams =
                serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))?;
            Some(params)
        }
        None => None,
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let assembly = assemble(faces, scale, params.as_ref(), &mut rng);
    let mesh = &assembly.mesh;
    mesh.validate().map_err(|e| format!("assembled mesh failed validation: {e}"))?;

    print_stats(faces, mesh);
    if let Some(params) = assembly.params.as_ref() {
        let json = serde_json::to_string(params).map_err(|e| format!("encode params: {e}"))?;
        println!("params: {json}");
    }

    if let Some(path) = obj_path {
        write_obj_file(&path, mesh, &format!("poly_{faces}"), overwrite)?;
        println!("wrote {}", path.display());
    }

    Ok(())
}

fn print_stats(faces: u32, mesh: &PolyMesh) {
    let edges = EdgeSet::from_mesh(mesh);
    let (center, radius) = mesh.bounding_sphere();
    println!("requested faces: {faces}");
    println!("vertices:        {}", mesh.vertex_count());
    println!("triangles:       {}", mesh.triangle_count());
    println!("edges:           {}", edges.len());
    println!("bounding sphere: center ({:.4}, {:.4}, {:.4}) radius {:.4}", center.x, center.y, center.z, radius);
}

fn write_obj_file(path: &Path, mesh: &PolyMesh, name: &str, overwrite: bool) -> Result<(), String> {
    if path.exists() && !overwrite {
        return Err(format!(
            "refusing to overwrite existing file {} (use --overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
    }

    let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# polystudio poly_cli").map_err(|e| format!("write obj: {e}"))?;
    writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

    for p in mesh.positions.iter().copied() {
        writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
    }
    for tri in mesh.indices.chunks_exact(3) {
        // OBJ indices are 1-based.
        writeln!(w, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)
            .map_err(|e| format!("write obj: {e}"))?;
    }

    w.flush().map_err(|e| format!("write obj: {e}"))
}

struct Args {
    args: Vec<String>,
    pos: usize,
}

impl Args {
    fn new(args: Vec<String>) -> Self {
        Self { args, pos: 0 }
    }

    fn next(&mut self) -> Option<String> {
        let arg = self.args.get(self.pos)?.clone();
        self.pos += 1;
        Some(arg)
    }

    fn value(&mut self, flag: &str) -> Result<String, String> {
        self.next()
            .ok_or_else(|| format!("missing value for {flag}"))
    }
}
