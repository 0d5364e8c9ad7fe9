//! Game errors.
//!
//! Every error leaves the game exactly as it was before the failing call.
//! The `Display` text is what a front end shows the player verbatim.

/// A requested action breaks a game rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    /// Planting on an acreage that already grows something.
    #[error("Something is already being grown on this field")]
    AcreageOccupied,

    /// The vegetable cannot grow on this acreage type.
    #[error("You cannot grow this vegetable on this acreage")]
    VegetableNotSuitable,

    /// Harvest amount of zero.
    #[error("Cannot harvest an amount smaller or equal to zero")]
    InvalidHarvestAmount,

    /// Harvest amount exceeds what grows on the acreage.
    #[error("There are not enough vegetables on this acreage")]
    NotEnoughOnAcreage,

    /// No acreage at the requested position.
    #[error("There is no acreage at the specified position")]
    NoAcreageAtPosition,

    /// The barn holds no vegetable of the requested kind to plant.
    #[error("You do not have enough vegetables to plant")]
    NotEnoughToPlant,

    /// The barn holds fewer vegetables than requested for sale.
    #[error("You do not have enough vegetables in your barn")]
    NotEnoughInBarn,

    /// The barn holds less gold than the price.
    #[error("You do not have enough gold in your barn")]
    NotEnoughGold,

    /// The position cannot be bought.
    #[error("Acreage is not purchasable")]
    NotPurchasable,

    /// The acreage market is exhausted.
    #[error("There are no acreages left in this game")]
    NoAcreagesLeft,
}

/// Errors surfaced by the game engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A game rule was broken; recoverable, the player may try something else.
    #[error("Error: {0}")]
    IllegalMove(#[from] IllegalMove),

    /// A collaborator violated a structural precondition.
    #[error("Error: {0}")]
    IllegalArgument(String),

    /// An action was invoked on a player with an exhausted move budget.
    ///
    /// This is a driver defect, not a player mistake.
    #[error("Player does not have any moves left")]
    NoMovesLeft,
}

impl GameError {
    /// Build an illegal-argument error.
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::IllegalArgument(message.into())
    }

    /// Is this a rule violation (as opposed to a protocol or argument defect)?
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, Self::IllegalMove(_))
    }
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
