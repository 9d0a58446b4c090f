use clap::Args;
use sonde_proto::packet::QueryType;
use sonde_resolver::prelude::Resolution;
use std::fmt::Write;
use std::time::Duration;

/// Resolves a single name and prints the answer
#[derive(Args, Debug)]
pub struct Command {
    /// Name to resolve
    name: String,
    /// Type of the records to look for
    #[arg(short, long, default_value = "A")]
    qtype: QueryType,
    /// Give up after this many seconds
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,
}

impl Command {
    pub async fn run(self, config: crate::config::Config) -> Result<(), super::Error> {
        let resolver = config.resolver.build()?;
        let result = resolver
            .resolve_within(&self.name, self.qtype, Duration::from_secs(self.timeout))
            .await;
        resolver.shutdown().await;
        print!("{}", format_resolution(&result?));
        Ok(())
    }
}

fn format_resolution(result: &Resolution) -> String {
    let message = &result.message;
    let mut output = String::new();
    let _ = writeln!(
        output,
        ";; {}. {} status: {}",
        result.name, result.qtype, message.header.response_code
    );
    if result.chain_truncated {
        let _ = writeln!(output, ";; alias chain truncated");
    }
    for (title, records) in [
        ("ANSWER", &message.answers),
        ("AUTHORITY", &message.authorities),
    ] {
        if records.is_empty() {
            continue;
        }
        let _ = writeln!(output, "\n;; {title} SECTION:");
        for record in records {
            let _ = writeln!(output, "{record}");
        }
    }
    let _ = writeln!(output, "\n;; Query time: {} msec", result.latency.as_millis());
    output
}
