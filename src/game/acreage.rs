//! Acreages: plantable land parcels.
//!
//! An acreage grows one vegetable species at a time. Planting starts a
//! growth countdown; every expiry doubles the stock until the type's
//! capacity is reached, at which point growth stops until the next harvest.

use std::fmt;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::countdown::{Countdown, Timed};
use crate::game::error::IllegalMove;
use crate::game::vegetable::Vegetable;

/// Stock multiplier applied on each growth step.
pub const GROW_FACTOR: u32 = 2;

// =============================================================================
// ACREAGE TYPE
// =============================================================================

/// Kind of land parcel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AcreageType {
    /// Small plot, grows everything
    Garden = 0,
    /// Field crops
    Field = 1,
    /// Field crops, double capacity
    LargeField = 2,
    /// Carrots and mushrooms
    Forest = 3,
    /// Carrots and mushrooms, double capacity
    LargeForest = 4,
}

impl AcreageType {
    /// Every type, in declaration order.
    pub const ALL: [AcreageType; 5] = [
        AcreageType::Garden,
        AcreageType::Field,
        AcreageType::LargeField,
        AcreageType::Forest,
        AcreageType::LargeForest,
    ];

    /// Maximum number of vegetables the parcel holds.
    pub const fn capacity(self) -> u32 {
        match self {
            AcreageType::Garden => 2,
            AcreageType::Field | AcreageType::Forest => 4,
            AcreageType::LargeField | AcreageType::LargeForest => 8,
        }
    }

    /// Parcels of this type that exist in a game per player (starting land included).
    pub const fn per_player(self) -> u32 {
        match self {
            AcreageType::Garden | AcreageType::Field => 4,
            AcreageType::LargeField | AcreageType::Forest => 2,
            AcreageType::LargeForest => 1,
        }
    }

    /// Species that may be planted on this type.
    pub const fn allowed(self) -> &'static [Vegetable] {
        match self {
            AcreageType::Garden => &Vegetable::ALL,
            AcreageType::Field | AcreageType::LargeField => {
                &[Vegetable::Carrot, Vegetable::Salad, Vegetable::Tomato]
            }
            AcreageType::Forest | AcreageType::LargeForest => {
                &[Vegetable::Carrot, Vegetable::Mushroom]
            }
        }
    }

    /// Can `vegetable` grow here?
    pub fn allows(self, vegetable: Vegetable) -> bool {
        self.allowed().contains(&vegetable)
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            AcreageType::Garden => "Garden",
            AcreageType::Field => "Field",
            AcreageType::LargeField => "Large Field",
            AcreageType::Forest => "Forest",
            AcreageType::LargeForest => "Large Forest",
        }
    }

    /// Board abbreviation.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            AcreageType::Garden => "G",
            AcreageType::Field => "Fi",
            AcreageType::LargeField => "LFi",
            AcreageType::Forest => "Fo",
            AcreageType::LargeForest => "LFo",
        }
    }
}

impl fmt::Display for AcreageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ACREAGE
// =============================================================================

/// What currently grows on an acreage. `amount` is always in `1..=capacity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    /// Species being grown
    pub vegetable: Vegetable,
    /// Units on the parcel
    pub amount: u32,
}

/// A single land parcel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acreage {
    acreage_type: AcreageType,
    crop: Option<Crop>,
    countdown: Countdown,
}

impl Acreage {
    /// Create an empty acreage.
    pub const fn new(acreage_type: AcreageType) -> Self {
        Self {
            acreage_type,
            crop: None,
            countdown: Countdown::new(),
        }
    }

    /// Land type.
    #[inline]
    pub fn acreage_type(&self) -> AcreageType {
        self.acreage_type
    }

    /// Capacity of this land type.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.acreage_type.capacity()
    }

    /// Nothing planted?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.crop.is_none()
    }

    /// Current crop, if any.
    #[inline]
    pub fn crop(&self) -> Option<Crop> {
        self.crop
    }

    /// Species being grown, if any.
    #[inline]
    pub fn vegetable(&self) -> Option<Vegetable> {
        self.crop.map(|c| c.vegetable)
    }

    /// Units on the parcel (0 when empty).
    #[inline]
    pub fn stock(&self) -> u32 {
        self.crop.map_or(0, |c| c.amount)
    }

    /// Has growth stopped at capacity?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.stock() == self.capacity()
    }

    /// Plant a single unit of `vegetable`.
    pub fn plant(&mut self, vegetable: Vegetable) -> Result<(), IllegalMove> {
        if self.crop.is_some() {
            return Err(IllegalMove::AcreageOccupied);
        }
        if !self.acreage_type.allows(vegetable) {
            return Err(IllegalMove::VegetableNotSuitable);
        }
        self.crop = Some(Crop { vegetable, amount: 1 });
        self.countdown.arm(vegetable.growth_time());
        Ok(())
    }

    /// Harvest `amount` units.
    ///
    /// Harvesting everything empties the parcel and stops growth. A partial
    /// harvest of a parcel whose growth had stopped at capacity restarts
    /// growth; a running countdown is left alone.
    pub fn harvest(&mut self, amount: u32) -> Result<(Vegetable, u32), IllegalMove> {
        if amount == 0 {
            return Err(IllegalMove::InvalidHarvestAmount);
        }
        let Some(crop) = self.crop.as_mut() else {
            return Err(IllegalMove::NotEnoughOnAcreage);
        };
        if amount > crop.amount {
            return Err(IllegalMove::NotEnoughOnAcreage);
        }

        let vegetable = crop.vegetable;
        crop.amount -= amount;

        if crop.amount == 0 {
            self.crop = None;
            self.countdown.disarm();
        } else if !self.countdown.is_armed() {
            self.countdown.arm(vegetable.growth_time());
        }
        Ok((vegetable, amount))
    }
}

impl Timed for Acreage {
    fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    fn countdown_mut(&mut self) -> &mut Countdown {
        &mut self.countdown
    }

    fn on_countdown(&mut self) {
        let capacity = self.capacity();
        let Some(crop) = self.crop.as_mut() else {
            return;
        };

        let grown = crop.amount.saturating_mul(GROW_FACTOR);
        if grown >= capacity {
            crop.amount = capacity;
        } else {
            crop.amount = grown;
            self.countdown.arm(crop.vegetable.growth_time());
        }
        debug!(
            acreage = self.acreage_type.name(),
            vegetable = %crop.vegetable,
            amount = crop.amount,
            "crop grew"
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================
