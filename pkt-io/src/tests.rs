// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#[cfg(test)]
mod test {
    use crate::{FileSource, MemoryQueue, Relay, RelayPolicy, RelayStats};
    use net::Ipv4Header;
    use net::ip::Protocol;
    use std::net::Ipv4Addr;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_file_to_queue_relay() {
        /*
         *   packet files ──► FileSource ──► Relay (decode, repair) ──► MemoryQueue
         *
         * One file holds a packet with a stale checksum, one is truncated.
         */
        let header = Ipv4Header::builder(
            Ipv4Addr::new(198, 51, 100, 7),
            Ipv4Addr::new(203, 0, 113, 9),
            Protocol::UDP,
        )
        .identification(0x1d1d)
        .payload(*b"0123456789")
        .build()
        .unwrap();
        let stale = header.encode().unwrap();
        let truncated = &stale[..12];

        let dir = std::env::temp_dir();
        let pid = std::process::id();
        let stale_path = dir.join(format!("{pid}-relay-stale.bin"));
        let truncated_path = dir.join(format!("{pid}-relay-truncated.bin"));
        std::fs::write(&stale_path, &stale).unwrap();
        std::fs::write(&truncated_path, truncated).unwrap();

        let policy = RelayPolicy {
            fix_checksum: true,
            drop_bad_checksum: false,
        };
        let mut relay = Relay::new(
            FileSource::new([stale_path.clone(), truncated_path.clone()]),
            MemoryQueue::new(),
            policy,
        );
        let stats = relay.run().unwrap();
        assert_eq!(
            stats,
            RelayStats {
                received: 2,
                forwarded: 1,
                malformed: 1,
                bad_checksum: 1,
                repaired: 1,
            }
        );
        assert!(logs_contain("relay done"));

        let mut out = relay.into_sink();
        let repaired = Ipv4Header::decode(&out.pop().unwrap()).unwrap();
        assert!(repaired.verify_checksum());
        assert_eq!(repaired.identification(), 0x1d1d);
        assert_eq!(repaired.payload(), b"0123456789");
        assert!(out.is_empty());

        std::fs::remove_file(stale_path).unwrap();
        std::fs::remove_file(truncated_path).unwrap();
    }
}
