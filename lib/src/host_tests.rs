use std::collections::HashSet;
use std::str::FromStr;

use super::*;

#[test]
fn identifies_reference_pairs() {
    for (ip, mac, id) in [
        ("", "", "d41d8cd98f00b204e9800998ecf8427e"),
        ("192.168.1.1", "", "66efff4c945d3c3b87fc271b47d456db"),
        ("", "28:6c:07:48:66:be", "924a7370c8df57b5b3f0a2e0d9d91598"),
        (
            "192.168.1.1",
            "28:6c:07:48:66:be",
            "7a48a7ba6494c7eb4c06e4787e9a6a88",
        ),
    ] {
        assert_eq!(identify(ip, mac), id, "ip: {:?}, mac: {:?}", ip, mac);
    }
}

#[test]
fn caches_host_id() {
    let host = Host::new(
        Ipv4Addr::new(192, 168, 1, 1),
        MacAddr::from_str("28:6c:07:48:66:be").unwrap(),
    );

    assert!(host.id.get().is_none(), "initial host ID is not empty");
    assert_eq!(host.id(), "7a48a7ba6494c7eb4c06e4787e9a6a88");
    assert!(host.id.get().is_some(), "host ID is not cached");
    assert_eq!(host.id(), "7a48a7ba6494c7eb4c06e4787e9a6a88");
    assert_eq!(host.ip(), Ipv4Addr::new(192, 168, 1, 1));
    assert_eq!(host.mac().to_string(), "28:6c:07:48:66:be");
}

#[test]
fn distinct_pairs_have_distinct_ids() {
    let macs = [
        MacAddr::new(0x28, 0x6c, 0x07, 0x48, 0x66, 0xbe),
        MacAddr::new(0x28, 0x6c, 0x07, 0x48, 0x66, 0xbf),
        MacAddr::new(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff),
    ];

    let mut ids = HashSet::new();
    let mut count = 0;

    for last in 0..=254u8 {
        for mac in macs {
            let host = Host::new(Ipv4Addr::new(192, 168, 1, last), mac);
            ids.insert(host.id().to_string());
            count += 1;
        }
    }

    assert_eq!(ids.len(), count);
}

#[test]
fn equality_follows_address_pair() {
    let mac = MacAddr::new(0x28, 0x6c, 0x07, 0x48, 0x66, 0xbe);
    let a = Host::new(Ipv4Addr::new(10, 0, 0, 1), mac);
    let b = Host::new(Ipv4Addr::new(10, 0, 0, 1), mac);
    let c = Host::new(Ipv4Addr::new(10, 0, 0, 2), mac);

    // computing the ID of one copy does not affect equality
    let _ = a.id();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
}
