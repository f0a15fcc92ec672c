//! Demo: recorre los escenarios principales del flujo de escaneo con tiempo
//! real (reducido por configuración si se desea).
use log::{error, info};
use phoenix_scan::errors::CoreError;
use phoenix_scan::{controller_builder, logging, AppConfig};
use scan_core::{ArtifactKind, ScanPhase, SessionSnapshot};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init_tracing();
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("config:error {e}");
            std::process::exit(2);
        }
    };
    info!("demo:start interval_ms={} step={} latency_ms={}",
          config.scan.cadence.interval().as_millis(),
          config.scan.cadence.step(),
          config.scan.latency.as_millis());

    let scenarios: [(ArtifactKind, Option<&str>); 4] = [(ArtifactKind::Hash, Some("d41d8cd98f00b204e9800998ecf8427e")),
                                                         (ArtifactKind::File, Some("malware_sample.exe")),
                                                         (ArtifactKind::Url, Some("https://example.com/download")),
                                                         (ArtifactKind::Url, Some(""))];
    for (kind, raw) in scenarios {
        run_scenario(&config, kind, raw).await;
    }
    if let Err(e) = run_supersede(&config).await {
        error!("supersede:error {e}");
    }
}

async fn run_scenario(config: &AppConfig, kind: ArtifactKind, raw: Option<&str>) {
    let mut controller = controller_builder(config).build();
    let route = match controller.submit(kind, raw) {
        Ok(r) => r,
        Err(e) => {
            println!("[{kind}] rechazado: {e} (fase={:?})", controller.phase());
            return;
        }
    };
    println!("[{kind}] {} -> ?{}", route.title(), route.to_query());
    println!("  Scanning with {} engines", controller.snapshot().scanning_engine_count);
    loop {
        match controller.next_update().await {
            Ok(snap) if snap.phase == ScanPhase::Complete => {
                print_results(&snap);
                break;
            }
            Ok(snap) => println!("  progress={}% verdicts={}", snap.progress, snap.verdicts.len()),
            Err(e) => {
                println!("  error: {e}");
                break;
            }
        }
    }
}

/// Envía A y, a mitad del escaneo, B: los resultados tardíos de A se descartan.
async fn run_supersede(config: &AppConfig) -> Result<(), CoreError> {
    let mut controller = controller_builder(config).build();
    controller.submit(ArtifactKind::Hash, Some("first"))?;
    let first = controller.session_id();
    controller.next_update().await?;
    controller.submit(ArtifactKind::Hash, Some("second"))?;
    let snap = controller.run_to_completion().await?;
    println!("[supersede] sesión vigente artifact={}", snap.artifact);
    print_results(&snap);
    if let Some(id) = first {
        let codes: Vec<_> = controller.events_for(id).iter().map(|e| e.kind.code()).collect();
        println!("[supersede] eventos de la sesión reemplazada: {}", codes.join(""));
    }
    Ok(())
}

fn print_results(snap: &SessionSnapshot) {
    let s = &snap.summary;
    println!("  completo: malicious={} suspicious={} clean={} undetected={} nivel={:?}",
             s.malicious_count,
             s.suspicious_count,
             s.clean_count,
             s.undetected_count,
             s.threat_level());
    for v in &snap.verdicts {
        match v.signature() {
            Some(sig) => println!("    {:<18} {:<10} {sig}", v.engine(), v.status()),
            None => println!("    {:<18} {}", v.engine(), v.status()),
        }
    }
}
