//! Integration test: SAP datagrams → registry → playlist file.
//!
//! Builds announcements the way a SAP announcer would, runs them through
//! the packet parser and registry, and checks the written M3U.

use sap::playlist::{self, PLAYLIST_HEADER};
use sap::{SapHeader, SapPacketParser, StreamRegistry, WriteOutcome, parse_packet};

fn sap_packet(header: SapHeader, mime: Option<&str>, sdp: &str) -> Vec<u8> {
    let mut packet = header.write().to_vec();
    packet.extend_from_slice(&[192, 168, 0, 10]);
    packet.extend(std::iter::repeat_n(0u8, header.auth_len as usize * 4));
    if let Some(mime) = mime {
        packet.extend_from_slice(mime.as_bytes());
        packet.push(0);
    }
    packet.extend_from_slice(sdp.as_bytes());
    packet
}

#[test]
fn synthetic_announcement_round_trip() {
    let packet = sap_packet(
        SapHeader::default(),
        Some("application/sdp"),
        "s=Test\r\nc=IN IP4 239.1.1.1/32\r\nm=video 5004 RTP/AVP 33\r\n",
    );

    let session = parse_packet(&packet).expect("valid announcement");
    assert_eq!(session.name, "Test");
    assert_eq!(session.stream_uri.as_deref(), Some("rtp://239.1.1.1:5004"));
}

#[test]
fn announcement_without_mime_type() {
    let packet = sap_packet(
        SapHeader::default(),
        None,
        "v=0\ns=Fallback\nc=IN IP4 239.5.5.5/16\nm=audio 5004 RTP/AVP 14\n",
    );

    let mut parser = SapPacketParser::new();
    let session = parser.parse(&packet).expect("parsed as SDP");
    assert_eq!(session.name, "Fallback");
    assert_eq!(session.stream_uri.as_deref(), Some("rtp://239.5.5.5:5004"));
}

#[test]
fn unsupported_headers_ignore_payload() {
    let sdp = "s=Hidden\r\nc=IN IP4 239.1.1.1\r\nm=video 5004 RTP/AVP 33\r\n";
    let headers = [
        SapHeader { version: 0, ..SapHeader::default() },
        SapHeader { version: 3, ..SapHeader::default() },
        SapHeader { encrypted: true, ..SapHeader::default() },
        SapHeader { compressed: true, ..SapHeader::default() },
    ];

    let mut parser = SapPacketParser::new();
    for header in headers {
        assert!(parser.parse(&sap_packet(header, Some("application/sdp"), sdp)).is_none());
    }
}

#[test]
fn channel_scan_to_playlist_file() {
    let announcements = [
        "v=0\r\ns=News 24\r\ni=Live feed\r\nc=IN IP4 239.1.1.1/32\r\na=x-plgroup:News\r\nm=video 5004 RTP/AVP 33\r\n",
        "v=0\r\ns=Radio One\r\nc=IN IP4 239.1.1.2/32\r\nm=audio 5004 RTP/AVP 14\r\n",
        // repeat of the first stream with a different name
        "v=0\r\ns=News 24 HD\r\nc=IN IP4 239.1.1.1/32\r\nm=video 5004 RTP/AVP 33\r\n",
        // named, but no connection: never listed
        "v=0\r\ns=No Address\r\nm=video 5006 RTP/AVP 33\r\n",
        // connection and media, but no name: dropped by the parser
        "v=0\r\nc=IN IP4 239.1.1.3/32\r\nm=video 5004 RTP/AVP 33\r\n",
    ];

    let mut parser = SapPacketParser::new();
    let mut registry = StreamRegistry::new();
    for (i, sdp) in announcements.iter().enumerate() {
        let header = SapHeader {
            msg_id_hash: i as u16,
            ..SapHeader::default()
        };
        if let Some(session) = parser.parse(&sap_packet(header, Some("application/sdp"), sdp)) {
            registry.register(session);
        }
    }
    assert_eq!(parser.packet_count(), 5);
    assert_eq!(registry.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sap_streams.m3u");
    assert_eq!(
        playlist::write(&registry, &path).unwrap(),
        WriteOutcome::Written(2)
    );

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            PLAYLIST_HEADER,
            "#EXTGRP:News",
            "#EXTINF:-1 tvg-id=\"239.1.1.1_5004\" tvg-name=\"News 24\" group-title=\"News\",News 24 - Live feed",
            "rtp://239.1.1.1:5004",
            "#EXTINF:-1 tvg-id=\"239.1.1.2_5004\" tvg-name=\"Radio One\" group-title=\"General\",Radio One",
            "rtp://239.1.1.2:5004",
        ]
    );
}

#[test]
fn empty_scan_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sap_streams.m3u");

    let outcome = playlist::write(&StreamRegistry::new(), &path).unwrap();
    assert_eq!(outcome, WriteOutcome::NothingToWrite);
    assert!(!path.exists());
}
