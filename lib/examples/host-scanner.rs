use color_eyre::eyre::{Result, eyre};
use std::{env, sync::mpsc, thread, time::Duration};

use hostsweep::scanners::{ScanMessage, Scanner, host_scanner::HostScanner};

fn is_root() -> bool {
    match env::var("USER") {
        Ok(val) => val == "root",
        Err(_e) => false,
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    if !is_root() {
        return Err(eyre!("permission denied: must run with root privileges"));
    }

    let (tx, rx) = mpsc::channel::<ScanMessage>();

    let scanner = HostScanner::builder()
        .notifier(tx)
        .sweep_interval(Duration::from_secs(5))
        .build()?;

    let handle = scanner.scan();

    let stopper = scanner.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(15));
        stopper.stop();
    });

    for msg in rx {
        match msg {
            ScanMessage::HostFound(host) => println!("found {} id={}", host, host.id()),
            ScanMessage::Done => println!("scanning complete"),
        }
    }

    handle
        .join()
        .map_err(|e| eyre!("scan thread panicked: {:?}", e))??;

    println!("results: {:?}", scanner.hosts());

    Ok(())
}
