//! Constantes del flujo de escaneo.
//!
//! Valores de referencia de la cadencia de progreso, la latencia simulada y
//! la heurística de veredictos. `ScanSettings::default()` se construye a
//! partir de ellos; la configuración de la aplicación puede sobreescribirlos.

/// Techo del progreso (porcentaje).
pub const PROGRESS_CEILING: u8 = 100;

/// Incremento de progreso por tick (puntos porcentuales).
pub const TICK_STEP: u8 = 10;

/// Intervalo entre ticks del tracker, en milisegundos.
pub const TICK_INTERVAL_MS: u64 = 300;

/// Latencia simulada del escaneo multi-motor, en milisegundos.
pub const SIMULATED_LATENCY_MS: u64 = 3_000;

/// Subcadenas del identificador que marcan un artifact como conocido-malo.
pub const KNOWN_BAD_MARKERS: &[&str] = &["malware", "virus"];

/// Para artifacts conocidos-malos: `r > MALICIOUS_THRESHOLD` => malicious.
pub const MALICIOUS_THRESHOLD: f64 = 0.3;

/// Para artifacts benignos: `r > BENIGN_SUSPICIOUS_THRESHOLD` => suspicious.
/// Ruido de falsos positivos sin objetivo documentado todavía.
pub const BENIGN_SUSPICIOUS_THRESHOLD: f64 = 0.9;

/// Firma fija adjunta a los veredictos `malicious` sintéticos.
pub const GENERIC_SIGNATURE: &str = "Trojan.Generic.KD.12345";
