//! Basic logger usage example
//!
//! Demonstrates text output with verbosity gating, JSON output with fields
//! and a context, and shipping JSON records over TCP to a local collector.
//!
//! Run with: cargo run --example basic_usage

use std::io::Read;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use structured_logger_system::prelude::*;
use structured_logger_system::{fields, log};

struct RequestId(&'static str);

fn main() -> Result<()> {
    println!("=== Structured Logger System - Basic Usage Example ===\n");

    // Text output to stdout, debug messages up to verbosity 2
    let logger = Logger::builder()
        .writer(TextWriter::stdout())
        .verbosity(2)
        .build();

    println!("1. Text output and verbosity:");
    logger.log("This is an info message");
    logger.v(1).log("This is a debug message at verbosity 1");
    logger.v(3).log("Verbosity 3 is above the threshold (hidden)");
    logger.error("connection refused").log("This is an error message");
    logger
        .with(fields! { "id" => "B8012423573231", "health" => 97 })
        .log("Hello World");
    log!(logger, "served {} requests", 12);

    println!("\n2. JSON output with a context:");
    let registry = Arc::new(ContextRegistry::new());
    registry.register(|ctx, fields| {
        if let Some(id) = ctx.value::<RequestId>() {
            fields.insert("request_id", id.0);
        }
    });

    let json = Logger::builder()
        .writer(JsonWriter::stdout())
        .context_registry(registry)
        .build();
    json.context(Context::new().with_value(RequestId("req-42")))
        .with(fields! { "attempt" => 3, "ratio" => 0.25 })
        .log("retrying upstream call");

    println!("\n3. JSON over TCP:");
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?.to_string();
    let collector = thread::spawn(move || -> std::io::Result<String> {
        let (mut stream, _) = listener.accept()?;
        let mut received = String::new();
        stream.read_to_string(&mut received)?;
        Ok(received)
    });

    let sink = NetworkSink::builder(address).buffer(64).build();
    sink.dial()?;

    let remote = Logger::builder()
        .writer(JsonWriter::new(sink.clone()).ecs().with_host("demo-host"))
        .build();
    remote.log("shipped over TCP");
    remote.error("disk full").log("shipped with an error");

    sink.close()?;
    let received = collector
        .join()
        .map_err(|_| LoggerError::other("collector thread panicked"))??;
    print!("   collector received:\n{}", received);
    println!(
        "   sent {} chunks, {} failures",
        sink.metrics().chunks_sent(),
        sink.metrics().send_failures()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
