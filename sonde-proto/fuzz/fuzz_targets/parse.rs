#![no_main]

use sonde_proto::DnsPacket;

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
    if let Ok(packet) = DnsPacket::try_from(data) {
        let _ = packet.create_buffer();
    }
});
