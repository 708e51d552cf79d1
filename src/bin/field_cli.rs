#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("field_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use segspace_engine::color::{Palette, export_luts};
    use segspace_engine::field::{
        FieldKind, FieldParams, FieldScene, evaluate_scene, solar_system_bodies,
    };
    use segspace_engine::geom::{IcosphereMesh, solar_system_orbits};
    use segspace_engine::parse::parse_bodies;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    const DEFAULT_FIELD_RADIUS: f64 = 120.0;
    const DEFAULT_FIELD_SUBDIVISIONS: u32 = 4;

    const USAGE: &str = r#"field_cli (segspace-engine)

USAGE:
  field_cli mesh <radius> <subdivisions>
  field_cli field [options]
  field_cli luts [options]
  field_cli orbits

OPTIONS (field):
  --subdiv <n>       Icosphere subdivision level (default 4)
  --radius <r>       Icosphere radius in AU (default 120)
  --bodies <path>    JSON body list (default: built-in solar system)

OPTIONS (luts):
  --out <path>       Write the export JSON here instead of stdout
  --overwrite        Overwrite an existing output file

  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "mesh" => cmd_mesh(&mut args),
            "field" => cmd_field(&mut args),
            "luts" => cmd_luts(&mut args),
            "orbits" => {
                cmd_orbits();
                Ok(())
            }
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

    fn cmd_mesh(args: &mut Args) -> Result<(), String> {
        let radius = parse_number::<f64>(&args.value("<radius>")?, "radius")?;
        let subdivisions = parse_number::<u32>(&args.value("<subdivisions>")?, "subdivisions")?;

        let (mesh, diagnostics) = IcosphereMesh::build_with_diagnostics(radius, subdivisions)
            .map_err(|e| e.to_string())?;
        println!("{}", mesh.stats());
        println!("{diagnostics}");
        Ok(())
    }

    fn cmd_field(args: &mut Args) -> Result<(), String> {
        let mut radius = DEFAULT_FIELD_RADIUS;
        let mut subdivisions = DEFAULT_FIELD_SUBDIVISIONS;
        let mut bodies_path: Option<PathBuf> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--subdiv" => subdivisions = parse_number(&args.value("--subdiv")?, "--subdiv")?,
                "--radius" => radius = parse_number(&args.value("--radius")?, "--radius")?,
                "--bodies" => bodies_path = Some(PathBuf::from(args.value("--bodies")?)),
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let bodies = match bodies_path.as_deref() {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("read {}: {e}", path.display()))?;
                parse_bodies(&json).map_err(|e| e.to_string())?
            }
            None => solar_system_bodies(),
        };
        for body in &bodies {
            eprintln!("  {body}");
        }

        let mesh = IcosphereMesh::build(radius, subdivisions).map_err(|e| e.to_string())?;
        let params = FieldParams::default();
        println!("{} | {params}", mesh.stats());

        let scene = FieldScene::new(Arc::new(mesh), bodies, params);
        let fields = evaluate_scene(&scene);
        for kind in FieldKind::ALL {
            let field = fields.field(kind);
            println!(
                "{:>16} ({}): min={:.6e} max={:.6e}",
                kind.name(),
                kind.symbol(),
                field.min,
                field.max
            );
        }
        Ok(())
    }

    fn cmd_luts(args: &mut Args) -> Result<(), String> {
        let mut out: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" => out = Some(PathBuf::from(args.value("--out")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let json = export_luts(&Palette::ALL).map_err(|e| e.to_string())?;
        match out.as_deref() {
            Some(path) => {
                write_text_file(path, &json, overwrite)?;
                eprintln!("wrote {}", path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }

    fn cmd_orbits() {
        for track in solar_system_orbits() {
            let (min_r, max_r) = track
                .points
                .iter()
                .map(|p| p.length())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                    (lo.min(r), hi.max(r))
                });
            println!(
                "{:<8} points={:<4} r=[{min_r:.3}, {max_r:.3}] AU",
                track.name,
                track.points.len()
            );
        }
    }

    fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
        raw.parse()
            .map_err(|_| format!("invalid value `{raw}` for {what}"))
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))
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
}
