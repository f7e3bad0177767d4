pub(crate) mod anim;
pub(crate) mod ease;
pub(crate) mod group;
pub(crate) mod timeline;
pub(crate) mod tween;
