mod control;
mod level;
mod outcome;
mod scene_impl;
mod types;

pub(crate) use scene_impl::build_scene;
