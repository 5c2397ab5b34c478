//! Typed flag bitsets for exits, doors, mobs and loads.
//!
//! [`FlagSet`] is a `u64` bitset parameterised over a [`Flag`] enum, so an
//! `ExitFlags` can never be mixed up with a `DoorFlags` at compile time.

use crate::direction::{ExitDirection, ALL_EXITS7};
use std::fmt;
use std::marker::PhantomData;

/// An enum whose variants occupy distinct bits of a [`FlagSet`].
pub trait Flag: Copy + Eq + fmt::Debug + 'static {
    /// Every variant, in bit order.
    const ALL: &'static [Self];

    /// Bit position of this variant. Must be below 64.
    fn bit(self) -> u32;
}

/// How a flag modification combines with the current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlagModifyMode {
    /// Turn the given flags on.
    Set,
    /// Turn the given flags off.
    Unset,
    /// Flip the given flags.
    Toggle,
}

/// A set of flags of one kind.
///
/// # Examples
///
/// ```
/// use atlas_core::{ExitFlag, ExitFlags};
///
/// let mut flags = ExitFlags::empty();
/// flags.insert(ExitFlag::Door);
/// assert!(flags.contains(ExitFlag::Door));
/// flags.toggle(ExitFlag::Door);
/// assert!(flags.is_empty());
/// ```
pub struct FlagSet<F: Flag> {
    bits: u64,
    _kind: PhantomData<fn() -> F>,
}

impl<F: Flag> FlagSet<F> {
    /// The empty set.
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            _kind: PhantomData,
        }
    }

    /// Construct from raw bits. Bits above the last variant are kept as-is.
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            bits,
            _kind: PhantomData,
        }
    }

    /// Raw bit representation.
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Add a flag.
    pub fn insert(&mut self, flag: F) {
        self.bits |= Self::mask(flag);
    }

    /// Remove a flag.
    pub fn remove(&mut self, flag: F) {
        self.bits &= !Self::mask(flag);
    }

    /// Flip a flag.
    pub fn toggle(&mut self, flag: F) {
        self.bits ^= Self::mask(flag);
    }

    /// Whether a single flag is set.
    pub fn contains(&self, flag: F) -> bool {
        self.bits & Self::mask(flag) != 0
    }

    /// Whether every flag in `other` is also set in `self`.
    ///
    /// An empty `other` is trivially contained.
    pub fn contains_all(&self, other: &Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Whether any flag in `other` is set in `self`.
    pub fn intersects(&self, other: &Self) -> bool {
        self.bits & other.bits != 0
    }

    /// Returns `true` if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of flags set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// `self | other`.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_bits(self.bits | other.bits)
    }

    /// `self - other`.
    pub fn difference(&self, other: &Self) -> Self {
        Self::from_bits(self.bits & !other.bits)
    }

    /// Apply every flag of `other` to `self` according to `mode`.
    pub fn modify(&mut self, other: &Self, mode: FlagModifyMode) {
        self.bits = match mode {
            FlagModifyMode::Set => self.bits | other.bits,
            FlagModifyMode::Unset => self.bits & !other.bits,
            FlagModifyMode::Toggle => self.bits ^ other.bits,
        };
    }

    /// Iterate over the set flags in bit order.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::ALL.iter().copied().filter(move |f| self.contains(*f))
    }

    fn mask(flag: F) -> u64 {
        1u64 << flag.bit()
    }
}

impl<F: Flag> Clone for FlagSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Flag> Copy for FlagSet<F> {}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Flag> PartialEq for FlagSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F: Flag> Eq for FlagSet<F> {}

impl<F: Flag> std::hash::Hash for FlagSet<F> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<F: Flag> From<F> for FlagSet<F> {
    fn from(flag: F) -> Self {
        let mut set = Self::empty();
        set.insert(flag);
        set
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

macro_rules! flag_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl Flag for $name {
            const ALL: &'static [Self] = &[$(Self::$variant,)+];

            fn bit(self) -> u32 {
                self as u32
            }
        }
    };
}

flag_enum! {
    /// Per-exit properties.
    ExitFlag {
        /// The exit is navigable.
        Exit,
        /// There is a door.
        Door,
        /// A road leads this way.
        Road,
        /// Leaving requires climbing.
        Climb,
        /// The exit leads to a random room.
        Random,
        /// Special (scripted) exit.
        Special,
        /// Exit must not be matched against observed exits.
        NoMatch,
        /// Water flows through this exit.
        Flow,
        /// Cannot flee through this exit.
        NoFlee,
        /// Passing through causes damage.
        Damage,
        /// Passing through causes a fall.
        Fall,
        /// The exit is guarded.
        Guarded,
    }
}

flag_enum! {
    /// Per-door properties.
    DoorFlag {
        /// The door is hidden.
        Hidden,
        /// Opening requires a key.
        NeedKey,
        /// The door cannot be blocked.
        NoBlock,
        /// The door cannot be broken.
        NoBreak,
        /// The lock cannot be picked.
        NoPick,
        /// The door opens after a delay.
        Delayed,
        /// The door can be called open.
        Callable,
        /// The door can be knocked on.
        Knockable,
        /// The door is magical.
        Magic,
        /// The door is opened by an action.
        Action,
        /// The door cannot be bashed.
        NoBash,
    }
}

flag_enum! {
    /// Mobiles found in a room.
    MobFlag {
        /// An inn to rent at.
        Rent,
        /// A general shop.
        Shop,
        /// A weapon shop.
        WeaponShop,
        /// An armour shop.
        ArmourShop,
        /// A food shop.
        FoodShop,
        /// A pet shop.
        PetShop,
        /// A guild master.
        Guild,
        /// A scout guild.
        ScoutGuild,
        /// A mage guild.
        MageGuild,
        /// A cleric guild.
        ClericGuild,
        /// A warrior guild.
        WarriorGuild,
        /// A ranger guild.
        RangerGuild,
        /// Aggressive mobiles.
        AggressiveMob,
        /// Quest mobiles.
        QuestMob,
        /// Passive mobiles.
        PassiveMob,
        /// Elite mobiles.
        EliteMob,
        /// Very strong mobiles.
        SuperMob,
        /// Something that can be milked.
        Milkable,
        /// A rattlesnake.
        Rattlesnake,
    }
}

flag_enum! {
    /// Objects and services found in a room.
    LoadFlag {
        /// Treasure.
        Treasure,
        /// Armour.
        Armour,
        /// Weapons.
        Weapon,
        /// Drinkable water.
        Water,
        /// Food.
        Food,
        /// Herbs.
        Herb,
        /// A key.
        Key,
        /// A mule.
        Mule,
        /// A horse.
        Horse,
        /// A pack horse.
        PackHorse,
        /// A trained horse.
        TrainedHorse,
        /// A Rohirrim mount.
        Rohirrim,
        /// A warg.
        Warg,
        /// A boat.
        Boat,
        /// Something worth attention.
        Attention,
        /// A tower with a view.
        Tower,
        /// A clock.
        Clock,
        /// A mailbox.
        Mail,
        /// A stable.
        Stable,
        /// A white word of power.
        WhiteWord,
        /// A dark word of power.
        DarkWord,
        /// Equipment.
        Equipment,
        /// A coach.
        Coach,
        /// A ferry.
        Ferry,
    }
}

impl Flag for ExitDirection {
    const ALL: &'static [Self] = &ALL_EXITS7;

    fn bit(self) -> u32 {
        self as u32
    }
}

/// Exit flags of a single exit.
pub type ExitFlags = FlagSet<ExitFlag>;
/// Door flags of a single exit.
pub type DoorFlags = FlagSet<DoorFlag>;
/// Mobile flags of a room.
pub type MobFlags = FlagSet<MobFlag>;
/// Load flags of a room.
pub type LoadFlags = FlagSet<LoadFlag>;
/// A set of exit directions.
pub type ExitDirections = FlagSet<ExitDirection>;
