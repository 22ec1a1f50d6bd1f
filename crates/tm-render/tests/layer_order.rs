use kurbo::Point;
use peniko::Color;
use tm_core::{EntityId, GridMap, GridPos, Token, Viewport};
use tm_render::surface::{alpha, to_color};
use tm_render::tokens::token_center;
use tm_render::{DisplayList, DrawOp, LayerKind, Pipeline, RenderContext, Theme};

struct Scene {
    viewport: Viewport,
    theme: Theme,
    map: GridMap,
    tokens: Vec<Token>,
}

impl Scene {
    fn new() -> Self {
        let mut map = GridMap::new(20, 15);
        map.reveal(0, 0, 5, 5);
        let mut hidden = Token::new(EntityId::intern("lurker"), 10, 10);
        hidden.color = Some(tm_core::Color::rgb8(200, 0, 0));
        let mut seen = Token::new(EntityId::intern("scout"), 2, 2);
        seen.color = Some(tm_core::Color::rgb8(0, 200, 0));
        Self {
            viewport: Viewport::default(),
            theme: Theme::default(),
            map,
            tokens: vec![hidden, seen],
        }
    }

    fn ctx(&self) -> RenderContext<'_> {
        let mut ctx = RenderContext::new(&self.viewport, &self.theme);
        ctx.map = Some(&self.map);
        ctx.tokens = &self.tokens;
        ctx
    }

    fn center_of(&self, id: &str) -> Point {
        let ctx = self.ctx();
        let token = self
            .tokens
            .iter()
            .find(|t| t.id == EntityId::intern(id))
            .unwrap();
        token_center(&ctx, token)
    }
}

fn render(pipeline: &Pipeline, ctx: &RenderContext<'_>) -> DisplayList {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut list = DisplayList::new();
    pipeline.render(&mut list, ctx);
    list
}

fn fill_color(op: Option<&DrawOp>) -> Option<Color> {
    match op {
        Some(DrawOp::Fill { color, .. }) => Some(*color),
        _ => None,
    }
}

#[test]
fn fog_occludes_tokens_in_player_view() {
    let scene = Scene::new();
    let list = render(&Pipeline::standard(), &scene.ctx());

    let top = fill_color(list.topmost_fill_at(scene.center_of("lurker")));
    assert_eq!(top, Some(to_color(scene.theme.fog_color, 1.0)));
    assert_eq!(top.map(alpha), Some(1.0));
}

#[test]
fn translucent_theme_still_occludes_in_player_view() {
    let mut scene = Scene::new();
    scene.theme =
        Theme::from_json(r##"{"fogPlayerOpacity": 0.4, "fogColor": "#20202080"}"##).unwrap();
    let list = render(&Pipeline::standard(), &scene.ctx());

    let top = fill_color(list.topmost_fill_at(scene.center_of("lurker")));
    assert_eq!(top.map(alpha), Some(1.0));
}

#[test]
fn revealed_tokens_are_visible() {
    let scene = Scene::new();
    let list = render(&Pipeline::standard(), &scene.ctx());

    let top = fill_color(list.topmost_fill_at(scene.center_of("scout")));
    assert_eq!(top, Some(to_color(tm_core::Color::rgb8(0, 200, 0), 1.0)));
}

#[test]
fn dm_view_previews_fog_translucently() {
    let scene = Scene::new();
    let mut ctx = scene.ctx();
    ctx.is_dm_view = true;
    let list = render(&Pipeline::standard(), &ctx);

    let top = fill_color(list.topmost_fill_at(scene.center_of("lurker")));
    assert_eq!(top.map(alpha), Some(scene.theme.fog_dm_opacity));

    // The token is still drawn beneath.
    let body = to_color(tm_core::Color::rgb8(200, 0, 0), 1.0);
    assert!(list
        .ops()
        .iter()
        .any(|op| matches!(op, DrawOp::Fill { color, .. } if *color == body)));
}

#[test]
fn ui_draws_after_fog() {
    let scene = Scene::new();
    let mut ctx = scene.ctx();
    ctx.hover = Some(GridPos::new(10, 10));
    let list = render(&Pipeline::standard(), &ctx);

    let fog = to_color(scene.theme.fog_color, 1.0);
    let last_fog = list
        .ops()
        .iter()
        .rposition(|op| matches!(op, DrawOp::Fill { color, .. } if *color == fog))
        .unwrap();
    let hover = to_color(scene.theme.hover_color, 1.0);
    let outline = list
        .position_from(0, |op| matches!(op, DrawOp::Stroke { color, .. } if *color == hover))
        .unwrap();
    assert!(outline > last_fog);
}

#[test]
fn hiding_the_fog_layer_exposes_tokens() {
    let scene = Scene::new();
    let mut pipeline = Pipeline::standard();
    pipeline.set_layer_visible(LayerKind::FogOfWar, false);
    let list = render(&pipeline, &scene.ctx());

    let top = fill_color(list.topmost_fill_at(scene.center_of("lurker")));
    assert_eq!(top, Some(to_color(tm_core::Color::rgb8(200, 0, 0), 1.0)));
}

#[test]
fn no_map_renders_only_the_clear() {
    let scene = Scene::new();
    let mut ctx = scene.ctx();
    ctx.map = None;
    let list = render(&Pipeline::standard(), &ctx);
    assert_eq!(list.len(), 1);
    assert!(matches!(list.ops()[0], DrawOp::Clear(_)));
}
