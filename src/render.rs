use crate::camera::Camera;
use crate::state::game_state::{Phase, Simulation};
use crate::state::{BoundingBox, Dir, Tile};
use crate::theme::{Rgb, ThemeTokens};

use image::GenericImageView;
use miniquad::*;
use std::collections::HashMap;

#[repr(C)]
struct Uniforms {
    mvp: [f32; 16],
    color: [f32; 4],
    uv_base: [f32; 4],  // xy used
    uv_scale: [f32; 4], // xy used
}

#[repr(C)]
struct Vertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

pub struct Renderer {
    pub ctx: Box<dyn RenderingBackend>,
    pipeline: Pipeline,
    bindings: Bindings,
    white: TextureId,
    circle: TextureId,
    coin_frames: Vec<TextureId>,
    // None: failed to load, don't retry
    images: HashMap<String, Option<TextureId>>,
}

const CIRCLE_TEXTURE_SIZE: u32 = 64;
const GRID_LINE_PX: f32 = 1.0;
const HIDDEN_TILE_ALPHA: f32 = 0.35;

fn load_texture(ctx: &mut Box<dyn RenderingBackend>, path: &str) -> Option<TextureId> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(err) => {
            log::warn!("failed to load image {path}: {err}");
            return None;
        }
    };
    let (w, h) = img.dimensions();
    if w > u16::MAX as u32 || h > u16::MAX as u32 {
        log::warn!("image {path} is too large ({w}x{h})");
        return None;
    }
    let rgba8 = img.to_rgba8();
    let texture = ctx.new_texture_from_rgba8(w as u16, h as u16, &rgba8);
    ctx.texture_set_filter(texture, FilterMode::Linear, MipmapFilterMode::None);
    ctx.texture_set_wrap(texture, TextureWrap::Clamp, TextureWrap::Clamp);

    Some(texture)
}

fn circle_rgba(size: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((size * size * 4) as usize);
    let radius = size as f32 * 0.5;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - radius;
            let dy = y as f32 + 0.5 - radius;
            let dist = (dx * dx + dy * dy).sqrt();
            let alpha = (radius - dist).clamp(0.0, 1.0);
            bytes.extend_from_slice(&[255, 255, 255, (alpha * 255.0) as u8]);
        }
    }
    bytes
}

fn rgba(color: Rgb, alpha: f32) -> [f32; 4] {
    color.to_rgba_f32(alpha)
}

fn tile_fill(tile: Tile, theme: &ThemeTokens, show_hidden: bool) -> Option<[f32; 4]> {
    let alpha = if tile.is_visible() {
        1.0
    } else if show_hidden {
        HIDDEN_TILE_ALPHA
    } else {
        return None;
    };
    let color = match tile {
        Tile::Empty | Tile::WalkerSpawn => return None,
        Tile::Solid => theme.solid,
        Tile::Platform => theme.platform,
        Tile::Hazard | Tile::HiddenHazard => theme.hazard,
        Tile::Goal | Tile::HiddenGoal => theme.goal,
    };
    Some(rgba(color, alpha))
}

// Offset of the player sprite while waiting to respawn. Fades out as `progress` goes to 1.
fn respawn_shake(elapsed: f32, progress: f32) -> (f32, f32) {
    let strength = 4.0 * (1.0 - progress.clamp(0.0, 1.0));
    (
        (elapsed * 61.0).sin() * strength,
        (elapsed * 47.0).cos() * strength * 0.5,
    )
}

fn respawn_blink_visible(elapsed: f32) -> bool {
    (elapsed * 20.0) as i64 % 2 == 0
}

impl Renderer {
    pub fn new() -> Renderer {
        let mut ctx = window::new_rendering_backend();

        // unit quad with UVs (0..1)
        let vertices: [Vertex; 4] = [
            Vertex {
                pos: [0.0, 0.0],
                uv: [0.0, 0.0],
            },
            Vertex {
                pos: [1.0, 0.0],
                uv: [1.0, 0.0],
            },
            Vertex {
                pos: [1.0, 1.0],
                uv: [1.0, 1.0],
            },
            Vertex {
                pos: [0.0, 1.0],
                uv: [0.0, 1.0],
            },
        ];
        let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];

        let vertex_buffer = ctx.new_buffer(
            BufferType::VertexBuffer,
            BufferUsage::Immutable,
            BufferSource::slice(&vertices),
        );
        let index_buffer = ctx.new_buffer(
            BufferType::IndexBuffer,
            BufferUsage::Immutable,
            BufferSource::slice(&indices),
        );

        // Create a 1x1 white texture for colored rectangles
        let white_tex_bytes: [u8; 4] = [255, 255, 255, 255];
        let white_texture = ctx.new_texture_from_rgba8(1, 1, &white_tex_bytes);
        ctx.texture_set_filter(white_texture, FilterMode::Nearest, MipmapFilterMode::None);
        ctx.texture_set_wrap(white_texture, TextureWrap::Clamp, TextureWrap::Clamp);

        let circle_texture = ctx.new_texture_from_rgba8(
            CIRCLE_TEXTURE_SIZE as u16,
            CIRCLE_TEXTURE_SIZE as u16,
            &circle_rgba(CIRCLE_TEXTURE_SIZE),
        );
        ctx.texture_set_filter(circle_texture, FilterMode::Linear, MipmapFilterMode::None);
        ctx.texture_set_wrap(circle_texture, TextureWrap::Clamp, TextureWrap::Clamp);

        let shader = ctx
            .new_shader(
                ShaderSource::Glsl {
                    vertex: VERTEX_SHADER,
                    fragment: FRAGMENT_SHADER,
                },
                ShaderMeta {
                    images: vec!["tex".to_string()],
                    uniforms: UniformBlockLayout {
                        uniforms: vec![
                            UniformDesc::new("mvp", UniformType::Mat4),
                            UniformDesc::new("color", UniformType::Float4),
                            UniformDesc::new("uv_base", UniformType::Float4),
                            UniformDesc::new("uv_scale", UniformType::Float4),
                        ],
                    },
                },
            )
            .expect("failed to compile shader");

        let pipeline = ctx.new_pipeline(
            &[BufferLayout::default()],
            &[
                VertexAttribute::new("pos", VertexFormat::Float2),
                VertexAttribute::new("uv", VertexFormat::Float2),
            ],
            shader,
            PipelineParams {
                color_blend: Some(BlendState::new(
                    Equation::Add,
                    BlendFactor::Value(BlendValue::SourceAlpha),
                    BlendFactor::OneMinusValue(BlendValue::SourceAlpha),
                )),
                cull_face: CullFace::Nothing,
                ..Default::default()
            },
        );

        let bindings = Bindings {
            vertex_buffers: vec![vertex_buffer],
            index_buffer,
            images: vec![white_texture],
        };

        Renderer {
            ctx,
            pipeline,
            bindings,
            white: white_texture,
            circle: circle_texture,
            coin_frames: vec![],
            images: HashMap::new(),
        }
    }

    pub fn load_coin_frames(&mut self, paths: &[String]) {
        self.coin_frames = paths
            .iter()
            .filter_map(|path| load_texture(&mut self.ctx, path))
            .collect();
        if self.coin_frames.is_empty() {
            log::info!("no coin frames, coins are drawn as circles");
        }
    }

    pub fn preload_images<'a>(&mut self, paths: impl IntoIterator<Item = &'a str>) {
        for path in paths {
            if !self.images.contains_key(path) {
                let texture = load_texture(&mut self.ctx, path);
                self.images.insert(path.to_string(), texture);
            }
        }
    }

    fn image(&self, path: Option<&str>) -> Option<TextureId> {
        path.and_then(|p| self.images.get(p)).copied().flatten()
    }

    // Caller draws UI on top and commits the frame
    pub fn draw(
        &mut self,
        sim: &Simulation,
        camera: &Camera,
        theme: &ThemeTokens,
        show_hidden: bool,
    ) {
        let clear = PassAction::Clear {
            color: Some((
                theme.background.r as f32 / 255.0,
                theme.background.g as f32 / 255.0,
                theme.background.b as f32 / 255.0,
                1.0,
            )),
            depth: Some(1.0),
            stencil: None,
        };
        self.ctx.begin_default_pass(clear);
        self.ctx.apply_pipeline(&self.pipeline);

        let level = sim.level();
        let map = &level.map;
        let tile = map.tile_size();

        self.draw_grid_lines(camera, map.cols(), map.rows(), tile, rgba(theme.grid, 1.0));

        let tile_texture = self.image(level.tile_texture.as_deref());
        for (pos, t) in map.iter() {
            let Some(color) = tile_fill(t, theme, show_hidden) else {
                continue;
            };
            let rect = map.tile_rect(pos);
            match t {
                Tile::Solid => match tile_texture {
                    Some(texture) => {
                        self.draw_textured(camera, texture, &rect, [1.0, 1.0, 1.0, 1.0])
                    }
                    None => self.draw_rect(camera, &rect, color),
                },
                Tile::Platform => {
                    let slab = BoundingBox::new(rect.x, rect.y, rect.w, rect.h * 0.25);
                    self.draw_rect(camera, &slab, color);
                }
                Tile::Hazard | Tile::HiddenHazard => {
                    let inset = tile * 0.12;
                    let spike = BoundingBox::new(
                        rect.x + inset,
                        rect.y + inset,
                        rect.w - 2.0 * inset,
                        rect.h - inset,
                    );
                    self.draw_rect(camera, &spike, color);
                }
                _ => self.draw_rect(camera, &rect, color),
            }
        }

        for walker in &level.walkers {
            self.draw_rect(camera, &walker.bb, rgba(theme.hazard, 1.0));
            let eye = walker.bb.h * 0.18;
            let eye_x = match walker.dir {
                Dir::Right => walker.bb.x + walker.bb.w * 0.7,
                Dir::Left => walker.bb.x + walker.bb.w * 0.3 - eye,
            };
            let eye_rect = BoundingBox::new(eye_x, walker.bb.y + walker.bb.h * 0.25, eye, eye);
            self.draw_rect(camera, &eye_rect, rgba(theme.solid, 1.0));
        }

        let coin_scale = sim.config().coin_scale;
        let coin_texture = if self.coin_frames.is_empty() {
            self.circle
        } else {
            self.coin_frames[sim.coin_frame(self.coin_frames.len())]
        };
        let coin_tint = if self.coin_frames.is_empty() {
            rgba(theme.coin, 1.0)
        } else {
            [1.0, 1.0, 1.0, 1.0]
        };
        for coin in level.coins.iter().filter(|c| !c.taken) {
            let bb = coin.bb(tile, coin_scale);
            self.draw_textured(camera, coin_texture, &bb, coin_tint);
        }

        let mut player_bb = sim.player().bb;
        let mut player_visible = true;
        if let Some(progress) = sim.respawn_progress() {
            let (sx, sy) = respawn_shake(sim.elapsed(), progress);
            player_bb.x += sx;
            player_bb.y += sy;
            player_visible = respawn_blink_visible(sim.elapsed());
        }
        if player_visible && player_bb.is_sane() {
            self.draw_rect(camera, &player_bb, rgba(theme.player, 1.0));
        }

        if let Some(overlay) = self.image(level.overlay_image.as_deref()) {
            let board = BoundingBox::new(0.0, 0.0, map.width(), map.height());
            let alpha = if sim.phase() == Phase::Play { 1.0 } else { 0.6 };
            self.draw_textured(camera, overlay, &board, [1.0, 1.0, 1.0, alpha]);
        }

        self.ctx.end_render_pass();
    }

    fn draw_grid_lines(
        &mut self,
        camera: &Camera,
        cols: usize,
        rows: usize,
        tile: f32,
        color: [f32; 4],
    ) {
        // One screen pixel wide whatever the zoom
        let line = GRID_LINE_PX / camera.zoom;
        let width = cols as f32 * tile;
        let height = rows as f32 * tile;
        for col in 0..=cols {
            let x = col as f32 * tile - line * 0.5;
            self.draw_rect(camera, &BoundingBox::new(x, 0.0, line, height), color);
        }
        for row in 0..=rows {
            let y = row as f32 * tile - line * 0.5;
            self.draw_rect(camera, &BoundingBox::new(0.0, y, width, line), color);
        }
    }

    fn draw_rect(&mut self, camera: &Camera, rect: &BoundingBox, color: [f32; 4]) {
        self.draw_textured(camera, self.white, rect, color);
    }

    fn draw_textured(
        &mut self,
        camera: &Camera,
        texture: TextureId,
        rect: &BoundingBox,
        color: [f32; 4],
    ) {
        self.bindings.images[0] = texture;
        self.ctx.apply_bindings(&self.bindings);

        let view = Self::camera_view(camera);
        let proj = Self::ortho_mvp(camera);
        let model = Self::mat4_mul(
            Self::mat4_translation(rect.x, rect.y),
            Self::mat4_scale(rect.w, rect.h),
        );
        let vp = Self::mat4_mul(proj, view);
        let mvp = Self::mat4_mul(vp, model);

        let uniforms = Uniforms {
            mvp,
            color,
            uv_base: [0.0, 0.0, 0.0, 0.0],
            uv_scale: [1.0, 1.0, 0.0, 0.0],
        };
        self.ctx.apply_uniforms(UniformsSource::table(&uniforms));
        self.ctx.draw(0, 6, 1);
    }

    pub fn texture_count(&self) -> usize {
        self.coin_frames.len() + self.images.values().filter(|t| t.is_some()).count()
    }

    fn ortho_mvp(camera: &Camera) -> [f32; 16] {
        let l = 0.0;
        let r = camera.screen_w;
        let t = 0.0;
        let b = camera.screen_h;
        let n = -1.0;
        let f = 1.0;
        let sx = 2.0 / (r - l);
        let sy = 2.0 / (t - b);
        let sz = -2.0 / (f - n);
        let tx = -((r + l) / (r - l));
        let ty = -((t + b) / (t - b));
        let tz = -((f + n) / (f - n));
        [
            sx, 0.0, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 0.0, sz, 0.0, tx, ty, tz, 1.0,
        ]
    }

    fn camera_view(camera: &Camera) -> [f32; 16] {
        let scale_zoom = Self::mat4_scale(camera.zoom, camera.zoom);
        let translate_to_board = Self::mat4_translation(camera.offset_x, camera.offset_y);
        Self::mat4_mul(translate_to_board, scale_zoom)
    }

    fn mat4_mul(a: [f32; 16], b: [f32; 16]) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a[k * 4 + row] * b[col * 4 + k];
                }
                out[col * 4 + row] = sum;
            }
        }
        out
    }

    fn mat4_translation(tx: f32, ty: f32) -> [f32; 16] {
        [
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, tx, ty, 0.0, 1.0,
        ]
    }

    fn mat4_scale(sx: f32, sy: f32) -> [f32; 16] {
        [
            sx, 0.0, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ]
    }
}

const VERTEX_SHADER: &str = r#"#version 100
attribute vec2 pos;
attribute vec2 uv;
uniform mat4 mvp;
uniform vec4 color;
uniform vec4 uv_base;
uniform vec4 uv_scale;
varying vec4 v_color;
varying vec2 v_uv;
void main() {
    gl_Position = mvp * vec4(pos, 0.0, 1.0);
    v_color = color;
    v_uv = uv_base.xy + uv * uv_scale.xy;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 100
precision mediump float;
varying vec4 v_color;
varying vec2 v_uv;
uniform sampler2D tex;
void main() {
    gl_FragColor = texture2D(tex, v_uv) * v_color;
}
"#;
