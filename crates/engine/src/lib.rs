pub mod app;
pub mod physics;

pub use app::{
    run_app, run_app_with_metrics, world_to_screen, AppError, Banner, BannerStyle, Camera2D,
    Entity, EntityId, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot, MetricsHandle,
    RenderableDesc, RenderableKind, Renderer, Scene, SceneCommand, SceneWorld, Transform, Vec2,
    Viewport, PIXELS_PER_WORLD, SLOW_FRAME_ENV_VAR,
};
