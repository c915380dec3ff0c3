//! Action construction by name.
//!
//! The factory maps each `ActionName` to a constructor taking the action's
//! `ExtraActionParams`. The name space is closed: every variant is
//! registered by `GameActionFactory::new`, and asking for a name that is
//! not registered is a programming error.

use rustc_hash::FxHashMap;

use super::{
    ActionName, BattleInitialAnimationGameAction, CardAttackGameAction, CardDestructionGameAction,
    DrawCardGameAction, ExtraActionParams, GameAction, GameOverGameAction, IdleGameAction,
    NextPlayerGameAction, PlayCardGameAction, PostNextPlayerGameAction,
};

/// Builds a boxed action from its params.
pub type ActionConstructor = fn(&ExtraActionParams) -> Box<dyn GameAction>;

/// Registered-variant table.
///
/// ## Example
///
/// ```
/// use battle_engine::actions::{ActionName, ExtraActionParams, GameActionFactory};
///
/// let factory = GameActionFactory::new();
/// let action = factory.create_game_action(ActionName::DrawCard, &ExtraActionParams::new());
/// assert_eq!(action.name(), ActionName::DrawCard);
/// ```
#[derive(Clone, Debug)]
pub struct GameActionFactory {
    constructors: FxHashMap<ActionName, ActionConstructor>,
}

impl Default for GameActionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl GameActionFactory {
    /// Factory with every action variant registered.
    #[must_use]
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register(ActionName::Idle, |_| Box::new(IdleGameAction));
        factory.register(ActionName::DrawCard, |_| Box::new(DrawCardGameAction::default()));
        factory.register(ActionName::PlayCard, |extra| {
            Box::new(PlayCardGameAction::from_params(extra))
        });
        factory.register(ActionName::NextPlayer, |_| {
            Box::new(NextPlayerGameAction::default())
        });
        factory.register(ActionName::PostNextPlayer, |_| {
            Box::new(PostNextPlayerGameAction)
        });
        factory.register(ActionName::CardAttack, |extra| {
            Box::new(CardAttackGameAction::from_params(extra))
        });
        factory.register(ActionName::CardDestruction, |extra| {
            Box::new(CardDestructionGameAction::from_params(extra))
        });
        factory.register(ActionName::GameOver, |extra| {
            Box::new(GameOverGameAction::from_params(extra))
        });
        factory.register(ActionName::BattleInitialAnimation, |extra| {
            Box::new(BattleInitialAnimationGameAction::from_params(extra))
        });
        factory
    }

    /// Factory with nothing registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: FxHashMap::default(),
        }
    }

    /// Register a constructor.
    ///
    /// Panics if the name is already registered.
    pub fn register(&mut self, name: ActionName, constructor: ActionConstructor) {
        if self.constructors.contains_key(&name) {
            panic!("{name} already registered");
        }
        self.constructors.insert(name, constructor);
    }

    #[must_use]
    pub fn is_registered(&self, name: ActionName) -> bool {
        self.constructors.contains_key(&name)
    }

    /// Registered names, sorted by their string form.
    #[must_use]
    pub fn registered_actions(&self) -> Vec<ActionName> {
        let mut names: Vec<_> = self.constructors.keys().copied().collect();
        names.sort_by_key(|name| name.as_str());
        names
    }

    /// Construct a new action.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered, or if the action rejects its
    /// params.
    #[must_use]
    pub fn create_game_action(
        &self,
        name: ActionName,
        extra: &ExtraActionParams,
    ) -> Box<dyn GameAction> {
        match self.constructors.get(&name) {
            Some(constructor) => constructor(extra),
            None => panic!("{name} is not a registered game action"),
        }
    }

    /// Construct a new action from its string name.
    ///
    /// # Panics
    ///
    /// Panics if `name` does not name an action.
    #[must_use]
    pub fn create_game_action_by_name(
        &self,
        name: &str,
        extra: &ExtraActionParams,
    ) -> Box<dyn GameAction> {
        match name.parse::<ActionName>() {
            Ok(name) => self.create_game_action(name, extra),
            Err(err) => panic!("{err}"),
        }
    }
}
