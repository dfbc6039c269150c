//! Per-kind entity payloads.
//!
//! One variant per kind family. The variant always agrees with the slot's
//! [`EntityKind`]; [`EntityData::for_kind`] is the only way a fresh payload
//! is produced.

use crate::serialise::{ByteSink, DataSerialiser, Serialise};

use super::kind::EntityKind;

/// Fields shared by guests and staff.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeepData {
    /// Custom name; `None` means the generated default.
    pub name: Option<String>,
    /// Energy, 0-255.
    pub energy: u8,
    /// Happiness, 0-255.
    pub happiness: u8,
    /// Nausea, 0-255.
    pub nausea: u8,
    /// Cash carried, in the park's fixed-point money unit.
    pub cash_in_pocket: i32,
}

impl Serialise for PeepData {
    fn serialise<S: ByteSink>(&self, stream: &mut DataSerialiser<'_, S>) {
        stream
            .write_opt_str(self.name.as_deref())
            .write_u8(self.energy)
            .write_u8(self.happiness)
            .write_u8(self.nausea)
            .write_i32(self.cash_in_pocket);
    }
}

/// Staff role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StaffType {
    /// Sweeps paths, waters gardens, empties bins, mows.
    #[default]
    Handyman,
    /// Inspects and fixes rides.
    Mechanic,
    /// Deters vandalism.
    Security,
    /// Keeps queues happy.
    Entertainer,
}

/// Costume worn by an entertainer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum EntertainerCostume {
    #[default]
    Panda,
    Tiger,
    Elephant,
    Roman,
    Gorilla,
    Snowman,
    Knight,
    Astronaut,
    Bandit,
    Sheriff,
    Pirate,
}

/// Bits of [`StaffData::orders`].
pub mod staff_orders {
    /// Handyman: sweep paths.
    pub const SWEEPING: u8 = 1 << 0;
    /// Handyman: water gardens.
    pub const WATER_FLOWERS: u8 = 1 << 1;
    /// Handyman: empty litter bins.
    pub const EMPTY_BINS: u8 = 1 << 2;
    /// Handyman: mow grass.
    pub const MOWING: u8 = 1 << 3;
    /// Mechanic: inspect rides.
    pub const INSPECT_RIDES: u8 = 1 << 0;
    /// Mechanic: fix rides.
    pub const FIX_RIDES: u8 = 1 << 1;
}

/// Staff payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaffData {
    /// Shared peep fields.
    pub peep: PeepData,
    /// Role.
    pub staff_type: StaffType,
    /// Order bits, see [`staff_orders`].
    pub orders: u8,
    /// Costume (entertainers only).
    pub costume: EntertainerCostume,
}

impl Serialise for StaffData {
    fn serialise<S: ByteSink>(&self, stream: &mut DataSerialiser<'_, S>) {
        self.peep.serialise(stream);
        stream
            .write_u8(self.staff_type as u8)
            .write_u8(self.orders)
            .write_u8(self.costume as u8);
    }
}

/// Ride vehicle payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VehicleData {
    /// Owning ride.
    pub ride: u16,
    /// Progress along the current track piece.
    pub track_progress: u16,
    /// Signed speed along the track.
    pub velocity: i32,
    /// Signed acceleration along the track.
    pub acceleration: i32,
}

impl Serialise for VehicleData {
    fn serialise<S: ByteSink>(&self, stream: &mut DataSerialiser<'_, S>) {
        stream
            .write_u16(self.ride)
            .write_u16(self.track_progress)
            .write_i32(self.velocity)
            .write_i32(self.acceleration);
    }
}

/// What a piece of litter looks like.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum LitterType {
    #[default]
    Vomit,
    VomitAlt,
    EmptyCan,
    Rubbish,
    BurgerBox,
    EmptyCup,
    EmptyBox,
    EmptyBottle,
    EmptyBowlRed,
    EmptyDrinkCarton,
    EmptyJuiceCup,
    EmptyBowlBlue,
}

/// Litter payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LitterData {
    /// Appearance.
    pub litter_type: LitterType,
    /// Scenario tick the litter was dropped on.
    pub creation_tick: u32,
}

impl Serialise for LitterData {
    fn serialise<S: ByteSink>(&self, stream: &mut DataSerialiser<'_, S>) {
        stream
            .write_u8(self.litter_type as u8)
            .write_u32(self.creation_tick);
    }
}

/// Floating money text payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoneyEffectData {
    /// Amount shown.
    pub value: i32,
    /// Rises vertically instead of drifting.
    pub vertical: bool,
}

/// Balloon payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalloonData {
    /// Palette colour.
    pub colour: u8,
    /// Popping animation in progress.
    pub popped: bool,
}

/// Duck behaviour state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DuckState {
    /// Flying in to land on water.
    #[default]
    FlyToWater,
    /// Paddling around.
    Swim,
    /// Drinking.
    Drink,
    /// Drinking twice.
    DoubleDrink,
    /// Leaving the park.
    FlyAway,
}

/// Duck payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DuckData {
    /// Behaviour state.
    pub state: DuckState,
}

impl DuckData {
    /// Returns true while the duck is airborne.
    #[must_use]
    pub const fn is_flying(self) -> bool {
        matches!(self.state, DuckState::FlyToWater | DuckState::FlyAway)
    }
}

/// Payload of the remaining particle effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticleData {
    /// Animation frame.
    pub frame: u16,
}

/// Kind-specific entity state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EntityData {
    /// Unused slot.
    #[default]
    None,
    /// Guest payload.
    Guest(PeepData),
    /// Staff payload.
    Staff(StaffData),
    /// Vehicle payload.
    Vehicle(VehicleData),
    /// Litter payload.
    Litter(LitterData),
    /// Money effect payload.
    MoneyEffect(MoneyEffectData),
    /// Balloon payload.
    Balloon(BalloonData),
    /// Duck payload.
    Duck(DuckData),
    /// Steam, crash debris, explosions, splashes and fountain jets.
    Particle(ParticleData),
}

impl EntityData {
    /// A zeroed payload of the right variant for `kind`.
    #[must_use]
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Null => Self::None,
            EntityKind::Guest => Self::Guest(PeepData::default()),
            EntityKind::Staff => Self::Staff(StaffData::default()),
            EntityKind::Vehicle => Self::Vehicle(VehicleData::default()),
            EntityKind::Litter => Self::Litter(LitterData::default()),
            EntityKind::MoneyEffect => Self::MoneyEffect(MoneyEffectData::default()),
            EntityKind::Balloon => Self::Balloon(BalloonData::default()),
            EntityKind::Duck => Self::Duck(DuckData::default()),
            EntityKind::SteamParticle
            | EntityKind::CrashedVehicleParticle
            | EntityKind::ExplosionCloud
            | EntityKind::CrashSplash
            | EntityKind::ExplosionFlare
            | EntityKind::JumpingFountain => Self::Particle(ParticleData::default()),
        }
    }

    /// Shared peep fields, for guests and staff.
    #[must_use]
    pub fn peep(&self) -> Option<&PeepData> {
        match self {
            Self::Guest(peep) => Some(peep),
            Self::Staff(staff) => Some(&staff.peep),
            _ => None,
        }
    }

    /// Mutable shared peep fields, for guests and staff.
    pub fn peep_mut(&mut self) -> Option<&mut PeepData> {
        match self {
            Self::Guest(peep) => Some(peep),
            Self::Staff(staff) => Some(&mut staff.peep),
            _ => None,
        }
    }
}

impl Serialise for EntityData {
    fn serialise<S: ByteSink>(&self, stream: &mut DataSerialiser<'_, S>) {
        match self {
            Self::None => {}
            Self::Guest(peep) => peep.serialise(stream),
            Self::Staff(staff) => staff.serialise(stream),
            Self::Vehicle(vehicle) => vehicle.serialise(stream),
            Self::Litter(litter) => litter.serialise(stream),
            Self::MoneyEffect(money) => {
                stream.write_i32(money.value).write_bool(money.vertical);
            }
            Self::Balloon(balloon) => {
                stream.write_u8(balloon.colour).write_bool(balloon.popped);
            }
            Self::Duck(duck) => {
                stream.write_u8(duck.state as u8);
            }
            Self::Particle(particle) => {
                stream.write_u16(particle.frame);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_matches_kind() {
        assert_eq!(EntityData::for_kind(EntityKind::Null), EntityData::None);
        assert!(matches!(
            EntityData::for_kind(EntityKind::Litter),
            EntityData::Litter(_)
        ));
        assert!(matches!(
            EntityData::for_kind(EntityKind::CrashSplash),
            EntityData::Particle(_)
        ));
        assert!(EntityData::for_kind(EntityKind::Staff).peep().is_some());
        assert!(EntityData::for_kind(EntityKind::Vehicle).peep().is_none());
    }

    #[test]
    fn test_duck_flying_states() {
        let mut duck = DuckData::default();
        assert!(duck.is_flying());
        duck.state = DuckState::Swim;
        assert!(!duck.is_flying());
        duck.state = DuckState::FlyAway;
        assert!(duck.is_flying());
    }

    #[test]
    fn test_peep_name_changes_encoding() {
        let mut plain = Vec::new();
        PeepData::default().serialise(&mut DataSerialiser::new(&mut plain));

        let named_peep = PeepData {
            name: Some("Mr Bean".to_string()),
            ..PeepData::default()
        };
        let mut named = Vec::new();
        named_peep.serialise(&mut DataSerialiser::new(&mut named));

        assert_ne!(plain, named);
        assert_eq!(named.len(), plain.len() + 2 + "Mr Bean".len());
    }
}
