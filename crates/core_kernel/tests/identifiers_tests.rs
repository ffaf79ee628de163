//! Unit tests for the identifier newtypes

use core_kernel::{ClaimId, TunnelId};
use uuid::Uuid;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(ClaimId::new(), ClaimId::new());
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = ClaimId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = ClaimId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(ClaimId::prefix(), "CLM");
    }

    #[test]
    fn test_from_uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let id = ClaimId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
        let back: Uuid = id.into();
        assert_eq!(back, uuid);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("CLM-xyz".parse::<ClaimId>().is_err());
        assert!("".parse::<ClaimId>().is_err());
    }
}

mod tunnel_id_tests {
    use super::*;

    #[test]
    fn test_prefix_and_display() {
        let id = TunnelId::new();
        assert_eq!(TunnelId::prefix(), "TUN");
        assert!(id.to_string().starts_with("TUN-"));
    }

    #[test]
    fn test_wrong_prefix_is_rejected() {
        let claim = ClaimId::new();
        // A claim-prefixed string is not a valid tunnel id
        assert!(claim.to_string().parse::<TunnelId>().is_err());
    }
}
