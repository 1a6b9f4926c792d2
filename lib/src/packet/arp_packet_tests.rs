use super::*;

const SOURCE_MAC: MacAddr = MacAddr(0x00, 0x11, 0x22, 0x33, 0x44, 0x55);
const DEVICE_MAC: MacAddr = MacAddr(0x28, 0x6c, 0x07, 0x48, 0x66, 0xbe);

fn request_frame() -> [u8; PKT_TOTAL_SIZE] {
    ArpPacketBuilder::default()
        .source_ip(Ipv4Addr::new(192, 168, 68, 1))
        .source_mac(SOURCE_MAC)
        .dest_ip(Ipv4Addr::new(192, 168, 68, 2))
        .build()
        .unwrap()
        .to_raw()
        .unwrap()
}

#[test]
fn creates_arp_packet() {
    let packet = request_frame();
    assert_eq!(packet.len(), 42);
}

#[test]
fn builds_broadcast_ethernet_frame() {
    let packet = request_frame();
    let eth = ethernet::EthernetPacket::new(&packet).unwrap();

    assert_eq!(eth.get_destination(), MacAddr::broadcast());
    assert_eq!(eth.get_source(), SOURCE_MAC);
    assert_eq!(eth.get_ethertype(), ethernet::EtherTypes::Arp);
}

#[test]
fn builds_arp_request_payload() {
    let packet = request_frame();
    let eth = ethernet::EthernetPacket::new(&packet).unwrap();
    let header = arp::ArpPacket::new(eth.payload()).unwrap();

    assert_eq!(header.get_hardware_type(), arp::ArpHardwareTypes::Ethernet);
    assert_eq!(header.get_protocol_type(), ethernet::EtherTypes::Ipv4);
    assert_eq!(header.get_hw_addr_len(), 6);
    assert_eq!(header.get_proto_addr_len(), 4);
    assert_eq!(header.get_operation(), arp::ArpOperations::Request);
    assert_eq!(header.get_sender_hw_addr(), SOURCE_MAC);
    assert_eq!(
        header.get_sender_proto_addr(),
        Ipv4Addr::new(192, 168, 68, 1)
    );
    assert_eq!(header.get_target_hw_addr(), MacAddr::zero());
    assert_eq!(
        header.get_target_proto_addr(),
        Ipv4Addr::new(192, 168, 68, 2)
    );
}

#[test]
fn fails_to_build_without_dest_ip() {
    let result = ArpPacketBuilder::default()
        .source_ip(Ipv4Addr::new(192, 168, 68, 1))
        .source_mac(SOURCE_MAC)
        .build();

    assert!(result.is_err());
}

#[test]
fn parses_arp_reply() {
    let device_ip = Ipv4Addr::new(192, 168, 68, 10);
    let frame = create_arp_reply(
        DEVICE_MAC,
        device_ip,
        SOURCE_MAC,
        Ipv4Addr::new(192, 168, 68, 1),
    );

    let reply = ArpReply::parse(&frame, SOURCE_MAC).unwrap();

    assert_eq!(reply.ip, device_ip);
    assert_eq!(reply.mac, DEVICE_MAC);
}

#[test]
fn parses_padded_arp_reply() {
    let frame = create_arp_reply(
        DEVICE_MAC,
        Ipv4Addr::new(192, 168, 68, 10),
        SOURCE_MAC,
        Ipv4Addr::new(192, 168, 68, 1),
    );

    // ethernet frames on the wire are padded to 60 bytes
    let mut padded = frame.to_vec();
    padded.resize(60, 0);

    assert!(ArpReply::parse(&padded, SOURCE_MAC).is_some());
}

#[test]
fn ignores_arp_requests() {
    let packet = request_frame();
    assert!(ArpReply::parse(&packet, DEVICE_MAC).is_none());
}

#[test]
fn ignores_self_originated_replies() {
    let frame = create_arp_reply(
        SOURCE_MAC,
        Ipv4Addr::new(192, 168, 68, 1),
        DEVICE_MAC,
        Ipv4Addr::new(192, 168, 68, 10),
    );

    assert!(ArpReply::parse(&frame, SOURCE_MAC).is_none());
}

#[test]
fn ignores_non_arp_frames() {
    let mut frame = create_arp_reply(
        DEVICE_MAC,
        Ipv4Addr::new(192, 168, 68, 10),
        SOURCE_MAC,
        Ipv4Addr::new(192, 168, 68, 1),
    );

    let mut eth = ethernet::MutableEthernetPacket::new(&mut frame).unwrap();
    eth.set_ethertype(ethernet::EtherTypes::Ipv4);

    assert!(ArpReply::parse(&frame, SOURCE_MAC).is_none());
}

#[test]
fn ignores_truncated_frames() {
    assert!(ArpReply::parse(&[1], SOURCE_MAC).is_none());
    assert!(ArpReply::parse(&[], SOURCE_MAC).is_none());

    let frame = create_arp_reply(
        DEVICE_MAC,
        Ipv4Addr::new(192, 168, 68, 10),
        SOURCE_MAC,
        Ipv4Addr::new(192, 168, 68, 1),
    );

    assert!(ArpReply::parse(&frame[..20], SOURCE_MAC).is_none());
}
