//! Account identities and chat group identifiers.

use std::fmt;

// ============================================================================
// Account Type
// ============================================================================

/// Account type encoded in bits 52..56 of an [`Identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Invalid,
    Individual,
    Multiseat,
    GameServer,
    AnonGameServer,
    Pending,
    ContentServer,
    Clan,
    Chat,
    ConsoleUser,
    AnonUser,
    /// Type nibble outside the known range.
    Unknown(u8),
}

impl AccountType {
    fn from_nibble(value: u8) -> Self {
        match value {
            0 => Self::Invalid,
            1 => Self::Individual,
            2 => Self::Multiseat,
            3 => Self::GameServer,
            4 => Self::AnonGameServer,
            5 => Self::Pending,
            6 => Self::ContentServer,
            7 => Self::Clan,
            8 => Self::Chat,
            9 => Self::ConsoleUser,
            10 => Self::AnonUser,
            other => Self::Unknown(other),
        }
    }
}

// ============================================================================
// Identity
// ============================================================================

/// 64-bit account identity.
///
/// Layout (most significant first):
/// - bits 56..64: universe
/// - bits 52..56: account type
/// - bits 32..52: instance
/// - bits 0..32: account number
///
/// Zero means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Identity(u64);

impl Identity {
    const TYPE_SHIFT: u32 = 52;
    const TYPE_MASK: u64 = 0xF;

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Builds an identity from its parts. Used mostly by tests and demos.
    pub const fn from_parts(universe: u8, account_type: u8, instance: u32, account: u32) -> Self {
        let raw = ((universe as u64) << 56)
            | (((account_type as u64) & Self::TYPE_MASK) << Self::TYPE_SHIFT)
            | (((instance as u64) & 0xF_FFFF) << 32)
            | account as u64;
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }

    pub fn account_type(self) -> AccountType {
        AccountType::from_nibble(((self.0 >> Self::TYPE_SHIFT) & Self::TYPE_MASK) as u8)
    }

    /// True for accounts that can receive direct messages.
    #[must_use]
    pub fn is_individual_account(self) -> bool {
        matches!(
            self.account_type(),
            AccountType::Individual | AccountType::ConsoleUser
        )
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Identity {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

// ============================================================================
// Group Id
// ============================================================================

/// Non-zero chat group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(u64);

impl GroupId {
    /// Returns `None` for zero, which configuration uses to mean "no group".
    pub fn new(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
