use pnet::util::MacAddr;
use std::net::Ipv4Addr;

use super::*;

#[test]
fn notifies_consumer() {
    let (tx, rx) = mpsc::channel();
    let notifier = Notifier::from(tx);
    let host = Host::new(Ipv4Addr::new(10, 0, 0, 1), MacAddr::new(1, 2, 3, 4, 5, 6));

    assert!(notifier.notify(ScanMessage::HostFound(host.clone())));

    match rx.recv().unwrap() {
        ScanMessage::HostFound(found) => assert_eq!(found, host),
        ScanMessage::Done => panic!("unexpected done message"),
    }
}

#[test]
fn closes_channel_exactly_once() {
    let (tx, rx) = mpsc::channel();
    let notifier = Notifier::from(tx);
    let clone = notifier.clone();

    assert!(notifier.close());
    assert!(!clone.close());
    assert!(!clone.notify(ScanMessage::Done));

    let messages: Vec<ScanMessage> = rx.iter().collect();

    assert_eq!(messages.len(), 1);
    assert!(matches!(messages[0], ScanMessage::Done));
}

#[test]
fn tolerates_dropped_consumer() {
    let (tx, rx) = mpsc::channel();
    let notifier = Notifier::from(tx);

    drop(rx);

    assert!(!notifier.notify(ScanMessage::Done));
    assert!(notifier.close());
}
