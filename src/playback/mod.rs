pub(crate) mod events;
pub(crate) mod group;
pub(crate) mod player;
