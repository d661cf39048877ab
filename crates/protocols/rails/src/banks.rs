//! Nigerian payout banks

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NigerianBank {
    /// CBN bank code
    pub code: &'static str,
    pub name: &'static str,
    pub swift: &'static str,
}

/// Banks that can receive NGN payouts
pub const SUPPORTED_BANKS: [NigerianBank; 10] = [
    NigerianBank {
        code: "058",
        name: "GTBank",
        swift: "GTBINGLA",
    },
    NigerianBank {
        code: "011",
        name: "First Bank",
        swift: "FBNINGLA",
    },
    NigerianBank {
        code: "057",
        name: "Zenith Bank",
        swift: "ZEABORLAG",
    },
    NigerianBank {
        code: "044",
        name: "Access Bank",
        swift: "ACCBPHHC",
    },
    NigerianBank {
        code: "033",
        name: "UBA",
        swift: "UNABORLAG",
    },
    NigerianBank {
        code: "032",
        name: "Union Bank",
        swift: "UBNMNGLA",
    },
    NigerianBank {
        code: "070",
        name: "Fidelity Bank",
        swift: "FIDTNGLA",
    },
    NigerianBank {
        code: "039",
        name: "Stanbic IBTC",
        swift: "SBICNGLX",
    },
    NigerianBank {
        code: "214",
        name: "FCMB",
        swift: "FCMBNGLA",
    },
    NigerianBank {
        code: "076",
        name: "Polaris Bank",
        swift: "PLATELAG",
    },
];

/// Look up a bank by CBN code
pub fn find_bank(code: &str) -> Option<&'static NigerianBank> {
    SUPPORTED_BANKS.iter().find(|bank| bank.code == code)
}
