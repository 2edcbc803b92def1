// Copyright 2026 The qqlocation Authors
use qqlocation::{address, MemoryReader};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => {
            let mut path_buf = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            path_buf.push("resources/ip-utf8.dat");
            path_buf
        }
    };
    let mut ips: Vec<String> = args.collect();
    if ips.is_empty() {
        ips.push("59.78.23.18".to_owned());
    }

    let reader = MemoryReader::open(&path)?;

    for ip in &ips {
        let ip = match address::to_ipv4(ip) {
            Ok(ip) => ip,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match reader.fetch(&ip) {
            // Record implements fmt::Display
            Ok(record) => println!("{}", record),
            Err(e) if e.is_not_found() => println!("{}: not found", ip),
            Err(e) => return Err(e.into()),
        }

        // Information implements serde::Serialization
        #[cfg(feature = "json")]
        {
            let info = reader.lookup_or_unknown(&ip.to_string())?;
            let serialized = serde_json::to_string_pretty(&info)?;
            println!("{}", serialized);
        }
    }

    Ok(())
}
