use raycaster::frame::column_angle;
use raycaster::texture::{pack_rgb, palette, shade};
use raycaster::{Frame, GridMap, Player, Shading, TextureSet, sample_column};

/// Draw settings that stay fixed for a run.
pub struct View<'a> {
    pub textures: Option<&'a TextureSet>,
    pub shading: Shading,
    /// Wall height in screen heights at unit distance.
    pub projection_scale: f32,
}

pub fn render_frame(buf: &mut [u32], width: usize, height: usize, frame: &Frame, view: &View) {
    // Clear background
    let sky = pack_rgb(30, 30, 70);
    let ground = pack_rgb(40, 40, 40);

    let mid = height / 2;
    buf[..mid * width].fill(sky);
    buf[mid * width..width * height].fill(ground);

    if frame.is_empty() {
        return;
    }

    let hits = frame.hits();
    let centre = height as f32 * 0.5;
    let screen_h = height as f32;

    for x in 0..width {
        // Frame columns are spread evenly over the framebuffer width
        let hit = &hits[x * hits.len() / width];

        let line_h = view.projection_scale * screen_h / hit.distance;
        let top = centre - 0.5 * line_h;
        let bottom = centre + 0.5 * line_h;

        let y0 = top.max(0.0) as usize;
        let y1 = (bottom.min(screen_h) as usize).min(height);
        if y0 >= y1 {
            continue;
        }

        let samples = sample_column(hit, view.textures, &view.shading);
        let n = samples.len();
        let texel_per_px = n as f32 / line_h;

        // Vertical draw
        let mut idx = y0 * width + x;
        for y in y0..y1 {
            let s = ((y as f32 - top) * texel_per_px) as usize;
            buf[idx] = samples[s.min(n - 1)];
            idx += width;
        }
    }
}

/// Top-down overlay in the corner: walls, the player and the rays of the
/// current frame.
pub fn draw_minimap(
    buf: &mut [u32],
    width: usize,
    height: usize,
    map: &GridMap,
    player: &Player,
    frame: &Frame,
    fov: f32,
) {
    let cells = map.width().max(map.height());
    let px = (width.min(height) / 3 / cells).max(1);
    let (mw, mh) = (map.width() * px, map.height() * px);
    if mw > width || mh > height {
        return;
    }

    let floor = pack_rgb(15, 15, 15);
    for (row, codes) in map.rows().enumerate() {
        for (col, &code) in codes.iter().enumerate() {
            let color = if code == 0 {
                floor
            } else {
                shade(palette(code), 0.6)
            };
            for y in row * px..(row + 1) * px {
                buf[y * width + col * px..y * width + (col + 1) * px].fill(color);
            }
        }
    }

    // world units -> minimap pixels
    let scale = px as f32 / map.cell_size();
    let mut plot = |wx: f32, wy: f32, color: u32| {
        let (x, y) = ((wx * scale) as isize, (wy * scale) as isize);
        if x >= 0 && y >= 0 && (x as usize) < mw && (y as usize) < mh {
            buf[y as usize * width + x as usize] = color;
        }
    };

    let ray_color = pack_rgb(240, 220, 120);
    let [ox, oy] = player.pos;
    let stride = (frame.len() / 24).max(1);
    for (i, hit) in frame.iter().enumerate().step_by(stride) {
        let angle = column_angle(player.heading, fov, i, frame.len());
        let (dx, dy) = (angle.cos(), angle.sin());
        let steps = ((hit.ray_length * scale) as usize).max(1);
        for s in 0..=steps {
            let t = hit.ray_length * s as f32 / steps as f32;
            plot(ox + dx * t, oy + dy * t, ray_color);
        }
    }

    let white = pack_rgb(255, 255, 255);
    let r = map.cell_size() / px as f32;
    for ddy in -1..=1 {
        for ddx in -1..=1 {
            plot(ox + ddx as f32 * r, oy + ddy as f32 * r, white);
        }
    }
}
