use log::debug;
use phoenix_scan::{config::init_dotenv, controller_builder, logging, AppConfig};
use scan_core::{ArtifactKind, EngineRegistry, RouteParams, ScanError};

const USAGE: &str = "uso: phoenix scan --kind <file|url|hash> --input <TXT> [--seed <N>] [--events] [--json]
       phoenix route --query <artifact=..&type=..>
       phoenix engines";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_dotenv();
    logging::init_tracing();
    // CLI mínima: `phoenix <cmd> [--flag valor]...`
    let args: Vec<String> = std::env::args().collect();
    debug!("cli:args count={}", args.len());
    let code = match args.get(1).map(String::as_str) {
        Some("scan") => run_scan(&args[2..]).await,
        Some("route") => run_route(&args[2..]),
        Some("engines") => {
            for (i, name) in EngineRegistry::default().engines().iter().enumerate() {
                println!("{:>2}. {name}", i + 1);
            }
            0
        }
        _ => {
            eprintln!("{USAGE}");
            2
        }
    };
    std::process::exit(code);
}

/// Opciones de `phoenix scan`.
#[derive(Debug, Default, PartialEq)]
struct ScanArgs {
    kind: Option<String>,
    input: Option<String>,
    seed: Option<u64>,
    events: bool,
    json: bool,
}

fn parse_scan_args(args: &[String]) -> Result<ScanArgs, String> {
    let mut out = ScanArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--kind" => {
                i += 1;
                out.kind = args.get(i).cloned();
            }
            "--input" => {
                i += 1;
                out.input = args.get(i).cloned();
            }
            "--seed" => {
                i += 1;
                let raw = args.get(i).ok_or("--seed requiere un valor")?;
                let seed = raw.parse::<u64>().map_err(|_| format!("--seed inválido: {raw}"))?;
                out.seed = Some(seed);
            }
            "--events" => out.events = true,
            "--json" => out.json = true,
            other => return Err(format!("argumento desconocido: {other}")),
        }
        i += 1;
    }
    Ok(out)
}

async fn run_scan(args: &[String]) -> i32 {
    let ScanArgs { kind,
                   input,
                   seed,
                   events,
                   json } = match parse_scan_args(args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("[phoenix scan] {e}");
            return 2;
        }
    };

    let kind = match kind.as_deref().unwrap_or("file").parse::<ArtifactKind>() {
        Ok(k) => k,
        Err(e) => {
            eprintln!("[phoenix scan] {e}");
            return 2;
        }
    };
    let mut config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[phoenix scan] {e}");
            return 2;
        }
    };
    if seed.is_some() {
        config.scan.seed = seed;
    }

    let mut controller = controller_builder(&config).build();
    let route = match controller.submit(kind, input.as_deref()) {
        Ok(r) => r,
        Err(e @ ScanError::Submission(_)) => {
            eprintln!("[phoenix scan] {e}");
            return 3;
        }
        Err(e) => {
            eprintln!("[phoenix scan] error: {e}");
            return 5;
        }
    };
    if !json {
        println!("{} ?{}", route.title(), route.to_query());
        println!("Scanning with {} engines", controller.snapshot().scanning_engine_count);
    }

    let snapshot = match controller.run_to_completion().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[phoenix scan] error: {e}");
            return 5;
        }
    };

    if json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("[phoenix scan] serialización: {e}");
                return 5;
            }
        }
    } else {
        let s = &snapshot.summary;
        println!("malicious={} suspicious={} clean={} undetected={} total={}",
                 s.malicious_count,
                 s.suspicious_count,
                 s.clean_count,
                 s.undetected_count,
                 s.total());
        for v in &snapshot.verdicts {
            println!("  {:<18} {:<10} {}", v.engine(), v.status(), v.signature().unwrap_or("-"));
        }
    }

    if events {
        if let Some(id) = controller.session_id() {
            for ev in controller.events_for(id) {
                match serde_json::to_string(&ev) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("[phoenix scan] evento {}: {e}", ev.seq),
                }
            }
        }
    }
    0
}

fn run_route(args: &[String]) -> i32 {
    let query = match (args.first().map(String::as_str), args.get(1)) {
        (Some("--query"), Some(q)) => q,
        _ => {
            eprintln!("{USAGE}");
            return 2;
        }
    };
    let params = RouteParams::from_query(query);
    println!("title={} artifact={} type={}", params.title(), params.artifact, params.kind);
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_scan_flags() {
        let parsed = parse_scan_args(&args(&["--kind", "url", "--input", "https://a.b", "--seed", "9", "--json"])).unwrap();
        assert_eq!(parsed,
                   ScanArgs { kind: Some("url".into()),
                              input: Some("https://a.b".into()),
                              seed: Some(9),
                              events: false,
                              json: true });
    }

    #[test]
    fn invalid_or_missing_seed_is_rejected() {
        assert!(parse_scan_args(&args(&["--seed", "abc"])).unwrap_err().contains("--seed"));
        assert!(parse_scan_args(&args(&["--seed", "-1"])).is_err());
        assert!(parse_scan_args(&args(&["--seed"])).is_err());
        assert!(parse_scan_args(&args(&["--verbose"])).is_err());
    }
}
