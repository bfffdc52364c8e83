//! TabStash bridge — the message protocol over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"action":"saveFile", "groupName":"...", "content":"..."}
//! Response: {"success":true, "path":...} or {"error":"..."}
//! Events such as {"type":"saveFileComplete", ...} and
//! {"type":"groupsUpdated", ...} are emitted out-of-band as their own
//! lines, since the requesting side may be gone before a write finishes.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use tabstash::app::App;
use tabstash::message_handler::handle_request;
use tabstash::platform;
use tabstash::types::message::Request;

use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Prefer TABSTASH_DATA_DIR, fall back to the platform data directory.
    let data_dir = match std::env::var("TABSTASH_DATA_DIR") {
        Ok(dir) => std::path::PathBuf::from(dir),
        Err(_) => platform::get_data_dir(),
    };
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data dir {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }
    let db_path = data_dir.join("tabstash.db");

    let (app, mut events) = match App::new(db_path.to_string_lossy().as_ref(), None) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("failed to initialize TabStash: {}", e);
            std::process::exit(1);
        }
    };
    let app = Mutex::new(app);

    // Out-of-band event pump: completions and group updates become their
    // own NDJSON lines.
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Ok(line) = serde_json::to_string(&event) {
                println!("{}", line);
                let _ = io::stdout().flush();
            }
        }
    });

    // Signal ready
    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    println!("{}", ready);
    let _ = io::stdout().flush();

    let mut rate_limiter = RateLimiter::new(200);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        if !rate_limiter.check() {
            println!("{}", json!({"error": "rate limit exceeded"}));
            let _ = io::stdout().flush();
            continue;
        }

        // Validate into the closed request set before dispatching anything.
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                println!("{}", json!({"error": format!("invalid request: {}", e)}));
                let _ = io::stdout().flush();
                continue;
            }
        };

        let response = handle_request(&app, request);
        match serde_json::to_string(&response) {
            Ok(out) => println!("{}", out),
            Err(e) => println!("{}", json!({"error": format!("response encoding failed: {}", e)})),
        }
        let _ = io::stdout().flush();
    }
}
