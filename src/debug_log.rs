//! Debug logging infrastructure for cave generation
//!
//! Logging is opt-in: nothing is written until `init_debug_log()` (which
//! targets `debug_cave.log` in the working directory) or `init_debug_log_at()`
//! has been called. The log file is recreated on each call. The Godot node
//! calls it from `ready` when its `debug_logging` property is set.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref DEBUG_LOG: Mutex<Option<File>> = Mutex::new(None);
}

/// Log a debug message to the cave debug log file
pub fn debug_log(msg: &str) {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }
    }
}

/// Initialize the debug log file (overwrites any existing log)
pub fn init_debug_log() {
    init_debug_log_at("debug_cave.log");
}

/// Initialize the debug log at `path` (overwrites any existing file)
pub fn init_debug_log_at(path: impl AsRef<Path>) {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        *guard = File::create(path).ok();
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "=== PIXY CAVE DEBUG LOG ===");
            let _ = writeln!(file, "Timestamp: {:?}", std::time::SystemTime::now());
            let _ = writeln!(file);
        }
    }
}

/// Stop writing to the log file.
pub fn close_debug_log() {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        *guard = None;
    }
}

/// Count vertices that appear at identical positions (within epsilon)
/// Returns the number of duplicate position groups found
pub fn count_duplicate_positions(vertices: &[[f32; 3]], epsilon: f32) -> usize {
    // Quantize positions to grid cells for fast lookup
    let scale = 1.0 / epsilon;
    let mut position_counts: HashMap<(i32, i32, i32), usize> = HashMap::new();

    for v in vertices {
        let key = (
            (v[0] * scale).round() as i32,
            (v[1] * scale).round() as i32,
            (v[2] * scale).round() as i32,
        );
        *position_counts.entry(key).or_insert(0) += 1;
    }

    position_counts.values().filter(|&&count| count > 1).count()
}

/// Render a per-stage wall count line, e.g. `[fill] 812/3072 wall cells (26.4%)`.
pub fn format_wall_ratio(stage: &str, walls: usize, total: usize) -> String {
    let pct = if total == 0 {
        0.0
    } else {
        walls as f32 * 100.0 / total as f32
    };
    format!("[{}] {}/{} wall cells ({:.1}%)", stage, walls, total, pct)
}
