//! Token layer.
//!
//! Two passes: every drawable aura first, so auras sit behind all bodies,
//! then the bodies. The selected token is held back and drawn last so nothing
//! overlaps it. Each body is drawn in token-local space (origin at the
//! footprint's top-left corner).

use crate::context::{RenderContext, point};
use crate::layer::{Layer, LayerKind};
use crate::surface::{Primitive, Surface, TextAnchor, dashed, to_color};
use kurbo::{Affine, Circle, Point, Rect, Stroke};
use tm_core::{Color, GridBounds, GridMap, Token, TokenShape};

const OUTLINE_WIDTH: f64 = 1.5;
const SELECTED_OUTLINE_WIDTH: f64 = 3.5;
const AURA_STROKE_WIDTH: f64 = 1.5;
/// Opacity of hidden tokens in GM view.
const HIDDEN_OPACITY: f32 = 0.5;

pub struct TokenLayer;

impl Layer for TokenLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Tokens
    }

    fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>) {
        let Some(map) = ctx.map else { return };
        let view = ctx.viewport.visible_grid_bounds();

        let drawn: Vec<&Token> = ctx
            .tokens
            .iter()
            .filter(|t| ctx.shows_token(t))
            .filter(|t| reach_bounds(t, map).intersects(&view))
            .collect();

        for token in &drawn {
            draw_auras(surface, ctx, token, map);
        }

        let mut selected = None;
        for token in &drawn {
            if ctx.selected == Some(token.id) {
                selected = Some(*token);
                continue;
            }
            draw_body(surface, ctx, token, false);
        }
        if let Some(token) = selected {
            draw_body(surface, ctx, token, true);
        }
    }
}

/// Aura radius in cells, capped at the map's width plus height so an absurd
/// radius still yields finite geometry.
fn aura_cells(radius_feet: f32, map: &GridMap) -> f32 {
    let cap = map.grid_width.saturating_add(map.grid_height).max(1) as f32;
    (radius_feet / map.feet_per_cell()).min(cap)
}

/// Cells a token can paint into, auras included.
fn reach_bounds(token: &Token, map: &GridMap) -> GridBounds {
    let reach = token
        .auras
        .iter()
        .filter(|a| a.is_drawable())
        .map(|a| aura_cells(a.radius_feet, map).ceil() as i32)
        .max()
        .unwrap_or(0);
    let b = token.cell_bounds();
    GridBounds::new(b.min.offset(-reach, -reach), b.max.offset(reach, reach))
}

fn body_color(ctx: &RenderContext<'_>, token: &Token) -> Color {
    token.color.unwrap_or(if token.is_enemy {
        ctx.theme.enemy_color
    } else {
        ctx.theme.ally_color
    })
}

fn draw_auras(surface: &mut dyn Surface, ctx: &RenderContext<'_>, token: &Token, map: &GridMap) {
    let rect = ctx.cell_rect(token.position(), token.footprint());
    let center = rect.center();
    for aura in token.auras.iter() {
        if !aura.is_drawable() {
            log::debug!("skipping aura with radius {} on {}", aura.radius_feet, token.id);
            continue;
        }
        let radius = aura_cells(aura.radius_feet, map) as f64 * ctx.cell_size();
        let color = aura.color.unwrap_or_else(|| body_color(ctx, token));
        let circle = Primitive::Circle(Circle::new(center, radius));
        surface.fill(&circle, to_color(color, ctx.theme.aura_opacity));
        surface.stroke(
            &circle,
            &dashed(AURA_STROKE_WIDTH, 6.0),
            to_color(color, (ctx.theme.aura_opacity * 4.0).min(1.0)),
        );
    }
}

fn draw_body(surface: &mut dyn Surface, ctx: &RenderContext<'_>, token: &Token, selected: bool) {
    let rect = ctx.cell_rect(token.position(), token.footprint());
    let size = rect.width();
    let inset = size * 0.08;
    let opacity = if token.is_visible { 1.0 } else { HIDDEN_OPACITY };
    let theme = ctx.theme;

    surface.save();
    surface.transform(Affine::translate(rect.origin().to_vec2()));

    let body = match token.shape {
        TokenShape::Circle => Primitive::Circle(Circle::new((size / 2.0, size / 2.0), size / 2.0 - inset)),
        TokenShape::Square => Primitive::Rect(Rect::new(inset, inset, size - inset, size - inset)),
    };
    surface.fill(&body, to_color(body_color(ctx, token), opacity));
    if selected {
        surface.stroke(
            &body,
            &Stroke::new(SELECTED_OUTLINE_WIDTH),
            to_color(theme.selection_color, 1.0),
        );
    } else {
        surface.stroke(
            &body,
            &Stroke::new(OUTLINE_WIDTH),
            to_color(theme.token_outline, opacity),
        );
    }

    let label = short_label(&token.label);
    if !label.is_empty() {
        surface.text(
            &label,
            Point::new(size / 2.0, size / 2.0),
            (size * 0.35).clamp(8.0, 24.0),
            TextAnchor::Center,
            to_color(theme.token_label_color, opacity),
        );
    }

    draw_hp_bar(surface, ctx, token, size, inset);
    draw_badges(surface, ctx, token, size);

    surface.restore();
}

/// First two characters, uppercased.
pub fn short_label(label: &str) -> String {
    label.trim().chars().take(2).collect::<String>().to_uppercase()
}

fn draw_hp_bar(surface: &mut dyn Surface, ctx: &RenderContext<'_>, token: &Token, size: f64, inset: f64) {
    let Some(ratio) = token.hp_ratio() else { return };
    let theme = ctx.theme;
    let bar_h = (size * 0.1).clamp(3.0, 6.0);
    let width = size - inset * 2.0;
    let top = size + 2.0;

    let track = Rect::new(inset, top, inset + width, top + bar_h);
    surface.fill(&Primitive::Rect(track), to_color(theme.hp_track, 1.0));
    if ratio > 0.0 {
        let filled = Rect::new(inset, top, inset + width * ratio as f64, top + bar_h);
        surface.fill(&Primitive::Rect(filled), to_color(theme.hp_color(ratio), 1.0));
    }

    if token.temp_hp > 0 {
        let temp = (token.temp_hp as f64 / token.max_hp as f64).min(1.0);
        let strip = Rect::new(inset, top + bar_h, inset + width * temp, top + bar_h * 1.5);
        surface.fill(&Primitive::Rect(strip), to_color(theme.temp_hp_color, 1.0));
    }
}

fn draw_badges(surface: &mut dyn Surface, ctx: &RenderContext<'_>, token: &Token, size: f64) {
    let r = (size * 0.14).clamp(5.0, 10.0);
    let font = r * 1.2;

    if !token.conditions.is_empty() {
        badge(surface, ctx, Point::new(size - r, r), r, &token.conditions.len().to_string(), font);
    }
    if token.movement_used > 0
        && let Some(left) = token.movement_remaining()
    {
        badge(surface, ctx, Point::new(r, size - r), r, &left.to_string(), font);
    }
}

fn badge(surface: &mut dyn Surface, ctx: &RenderContext<'_>, at: Point, r: f64, text: &str, font: f64) {
    surface.fill(&Primitive::Circle(Circle::new(at, r)), to_color(ctx.theme.badge_color, 1.0));
    surface.text(text, at, font, TextAnchor::Center, to_color(ctx.theme.badge_text, 1.0));
}

/// Screen-space center of a token's footprint.
pub fn token_center(ctx: &RenderContext<'_>, token: &Token) -> Point {
    let n = token.footprint() as f32;
    let p = ctx
        .viewport
        .grid_to_screen_f(token.grid_x as f32 + n / 2.0, token.grid_y as f32 + n / 2.0);
    point(p)
}
