use std::{net::Ipv4Addr, time::Duration};

use divan::black_box_drop;
use qqlocation::{FileReader, MemoryReader};
use rand::RngCore;

#[path = "../tests/common/mod.rs"]
mod common;

fn main() {
    divan::main();
}

#[inline]
fn random_ipv4(rng: &mut impl RngCore) -> Ipv4Addr {
    let mut ip = [0u8; 4];
    rng.fill_bytes(&mut ip);
    Ipv4Addr::from(ip)
}

#[divan::bench(min_time = Duration::from_secs(5), skip_ext_time)]
fn file_reader(bencher: divan::Bencher) {
    let mut db = FileReader::from_bytes(common::dense()).expect("failed to build database");
    let mut rng = rand::thread_rng();
    bencher
        .with_inputs(|| random_ipv4(&mut rng))
        .bench_local_values(move |ip| black_box_drop(db.fetch(&ip)));
}

#[divan::bench(min_time = Duration::from_secs(5))]
fn memory(bencher: divan::Bencher) {
    let db = MemoryReader::from_bytes(common::dense()).expect("failed to build database");
    let mut rng = rand::thread_rng();
    bencher
        .with_inputs(|| random_ipv4(&mut rng))
        .bench_local_values(move |ip| black_box_drop(db.fetch(&ip)));
}

#[divan::bench(min_time = Duration::from_secs(5))]
fn memory_resolve_only(bencher: divan::Bencher) {
    let db = MemoryReader::from_bytes(common::dense()).expect("failed to build database");
    let mut rng = rand::thread_rng();
    bencher
        .with_inputs(|| random_ipv4(&mut rng))
        .bench_local_values(move |ip| {
            let (ip_int, prefix) = qqlocation::address::split(&ip);
            black_box_drop(db.resolve(ip_int, prefix))
        });
}

