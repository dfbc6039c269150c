//! # Entity Kinds
//!
//! The closed set of entity types and the static tables keyed by them.
//! Category membership (misc, tweened, checksummed) lives here and nowhere
//! else; call sites match on [`EntityKind`] instead of testing flags.

use serde::{Deserialize, Serialize};

/// Number of live (non-Null) kinds.
pub const KIND_COUNT: usize = 13;

/// Type tag of an entity slot.
///
/// Discriminants are part of the serialised form and must not be reordered.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EntityKind {
    /// A ride vehicle (car, boat, train segment).
    Vehicle = 0,
    /// A park guest.
    Guest = 1,
    /// A hired staff member.
    Staff = 2,
    /// A piece of litter on a path.
    Litter = 3,
    /// Steam puff from a ride.
    SteamParticle = 4,
    /// Floating money text.
    MoneyEffect = 5,
    /// Debris from a crashed vehicle.
    CrashedVehicleParticle = 6,
    /// Explosion smoke.
    ExplosionCloud = 7,
    /// Water splash from a crash.
    CrashSplash = 8,
    /// Explosion flash.
    ExplosionFlare = 9,
    /// Water jet from a jumping fountain.
    JumpingFountain = 10,
    /// A balloon released by a guest.
    Balloon = 11,
    /// A duck.
    Duck = 12,
    /// Unused slot.
    #[default]
    Null = 255,
}

/// Broad grouping of kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    /// Unused slot.
    Null,
    /// Guests and staff.
    Peep,
    /// Ride vehicles.
    Vehicle,
    /// Litter.
    Litter,
    /// Short-lived visual effects, subject to the misc reservation cap.
    Misc,
}

impl EntityKind {
    /// Every live kind, in discriminant order.
    pub const ALL: [Self; KIND_COUNT] = [
        Self::Vehicle,
        Self::Guest,
        Self::Staff,
        Self::Litter,
        Self::SteamParticle,
        Self::MoneyEffect,
        Self::CrashedVehicleParticle,
        Self::ExplosionCloud,
        Self::CrashSplash,
        Self::ExplosionFlare,
        Self::JumpingFountain,
        Self::Balloon,
        Self::Duck,
    ];

    /// Kinds that are transient misc effects.
    pub const MISC: [Self; 9] = [
        Self::SteamParticle,
        Self::MoneyEffect,
        Self::CrashedVehicleParticle,
        Self::ExplosionCloud,
        Self::CrashSplash,
        Self::ExplosionFlare,
        Self::JumpingFountain,
        Self::Balloon,
        Self::Duck,
    ];

    /// Kinds whose movement is interpolated between ticks, in capture order.
    pub const TWEENED: [Self; 3] = [Self::Guest, Self::Staff, Self::Vehicle];

    /// Kinds fed to the desync checksum, in serialisation order.
    pub const CHECKSUMMED: [Self; 4] = [Self::Guest, Self::Staff, Self::Vehicle, Self::Litter];

    /// Decodes a serialised discriminant.
    #[must_use]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        let kind = match raw {
            0 => Self::Vehicle,
            1 => Self::Guest,
            2 => Self::Staff,
            3 => Self::Litter,
            4 => Self::SteamParticle,
            5 => Self::MoneyEffect,
            6 => Self::CrashedVehicleParticle,
            7 => Self::ExplosionCloud,
            8 => Self::CrashSplash,
            9 => Self::ExplosionFlare,
            10 => Self::JumpingFountain,
            11 => Self::Balloon,
            12 => Self::Duck,
            255 => Self::Null,
            _ => return None,
        };
        Some(kind)
    }

    /// Index into per-kind tables, `None` for [`EntityKind::Null`].
    #[inline]
    #[must_use]
    pub const fn table_index(self) -> Option<usize> {
        match self {
            Self::Null => None,
            live => Some(live as usize),
        }
    }

    /// The category this kind belongs to.
    #[must_use]
    pub const fn category(self) -> EntityCategory {
        match self {
            Self::Null => EntityCategory::Null,
            Self::Guest | Self::Staff => EntityCategory::Peep,
            Self::Vehicle => EntityCategory::Vehicle,
            Self::Litter => EntityCategory::Litter,
            Self::SteamParticle
            | Self::MoneyEffect
            | Self::CrashedVehicleParticle
            | Self::ExplosionCloud
            | Self::CrashSplash
            | Self::ExplosionFlare
            | Self::JumpingFountain
            | Self::Balloon
            | Self::Duck => EntityCategory::Misc,
        }
    }

    /// Returns true for transient effect kinds.
    #[inline]
    #[must_use]
    pub const fn is_misc(self) -> bool {
        matches!(self.category(), EntityCategory::Misc)
    }

    /// Returns true for kinds the tweener tracks.
    #[inline]
    #[must_use]
    pub const fn is_tweened(self) -> bool {
        matches!(
            self.category(),
            EntityCategory::Peep | EntityCategory::Vehicle
        )
    }

    /// Deepest zoom level at which a change to this kind is still redrawn.
    #[must_use]
    pub const fn default_max_zoom(self) -> u8 {
        match self {
            Self::Vehicle | Self::Guest | Self::Staff => 2,
            Self::SteamParticle
            | Self::MoneyEffect
            | Self::ExplosionCloud
            | Self::CrashSplash
            | Self::ExplosionFlare
            | Self::Balloon => 2,
            Self::Duck => 1,
            Self::CrashedVehicleParticle | Self::JumpingFountain | Self::Litter | Self::Null => 0,
        }
    }
}
