//! UI-side mesh consumer.
//!
//! The audio thread publishes a mesh only while it is empty; [`MeshPlot::poll`]
//! copies the snapshot out and hands the mesh back, so the next publish can
//! happen. A plot that stops polling simply stops receiving data.

use crate::Theme;
use egui::{Color32, Mesh, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2, pos2};
use surge_core::{
    GAIN_AMP_M_144_DB, GAIN_AMP_P_24_DB, MESH_TIME, MeshKind, MeshSnapshot, SurgeShared,
};

/// Append boundary points so a series closes into a polygon.
///
/// Returns `time` and `values` with one point at `floor` before the first
/// sample and one after the last, at the same time positions. Empty input
/// stays empty.
pub fn pad_closed(time: &[f32], values: &[f32], floor: f32) -> (Vec<f32>, Vec<f32>) {
    let n = time.len().min(values.len());
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut t = Vec::with_capacity(n + 2);
    let mut v = Vec::with_capacity(n + 2);
    t.push(time[0]);
    v.push(floor);
    t.extend_from_slice(&time[..n]);
    v.extend_from_slice(&values[..n]);
    t.push(time[n - 1]);
    v.push(floor);
    (t, v)
}

/// Repaint `ctx` if the filter asked for a redraw since the last call.
pub fn sync_redraw(ctx: &egui::Context, shared: &SurgeShared) -> bool {
    let pending = shared.take_redraw_request();
    if pending {
        ctx.request_repaint();
    }
    pending
}

/// Screen position of `(seconds ago, level)` inside `rect`.
///
/// Time runs right to left over [`MESH_TIME`]; levels map logarithmically
/// from −144 dB at the bottom to +24 dB at the top.
fn plot_pos(rect: Rect, t: f32, v: f32) -> Pos2 {
    let x = rect.right() - rect.width() * t / MESH_TIME;
    let zy = 1.0 / GAIN_AMP_M_144_DB;
    let dy = rect.height() / (GAIN_AMP_M_144_DB / GAIN_AMP_P_24_DB).ln();
    let y = rect.bottom() + dy * (v * zy).max(f32::MIN_POSITIVE).ln();
    pos2(x, y.clamp(rect.top(), rect.bottom()))
}

/// Latest snapshot of one mesh, drawn as a level-over-time plot.
pub struct MeshPlot {
    kind: MeshKind,
    snapshot: Option<MeshSnapshot>,
    filled: bool,
}

impl MeshPlot {
    /// Plot for `kind`, empty until the first [`poll`](Self::poll).
    pub fn new(kind: MeshKind) -> Self {
        Self {
            kind,
            snapshot: None,
            filled: false,
        }
    }

    /// Fill the area under each series.
    pub fn filled(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    /// Which mesh this plot consumes.
    pub fn kind(&self) -> MeshKind {
        self.kind
    }

    /// Take a newly published snapshot. `true` when one arrived.
    pub fn poll(&mut self, shared: &SurgeShared) -> bool {
        match shared.mesh(self.kind).take() {
            Some(snapshot) => {
                self.snapshot = Some(snapshot);
                true
            }
            None => false,
        }
    }

    /// Last snapshot taken.
    pub fn snapshot(&self) -> Option<&MeshSnapshot> {
        self.snapshot.as_ref()
    }

    fn series_color(&self, theme: &Theme, index: usize, count: usize) -> Color32 {
        match self.kind {
            MeshKind::Gain => theme.gain,
            MeshKind::Envelope => theme.envelope,
            MeshKind::Input => theme.channel_in(index, count),
            MeshKind::Output => theme.channel_out(index, count),
        }
    }

    /// Draw the last snapshot into a `size` area.
    pub fn show(&self, ui: &mut Ui, theme: &Theme, size: Vec2) -> Response {
        let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
        if !ui.is_rect_visible(rect) {
            return response;
        }
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, theme.background);

        let Some(snapshot) = &self.snapshot else {
            return response;
        };
        let time = snapshot.time();

        let series = snapshot.series();
        for (i, values) in series.iter().enumerate() {
            let color = self.series_color(theme, i, series.len());
            if self.filled {
                let (t, v) = pad_closed(time, values, GAIN_AMP_M_144_DB);
                let outline: Vec<Pos2> = t
                    .iter()
                    .zip(&v)
                    .map(|(&t, &v)| plot_pos(rect, t, v))
                    .collect();
                if outline.len() > 2 {
                    let curve = &outline[1..outline.len() - 1];
                    let fill = fill_under(curve, rect.bottom(), color.gamma_multiply(0.3));
                    painter.add(Shape::mesh(fill));
                    painter.add(Shape::closed_line(outline, Stroke::new(1.5, color)));
                }
            } else {
                let points: Vec<Pos2> = time
                    .iter()
                    .zip(values)
                    .map(|(&t, &v)| plot_pos(rect, t, v))
                    .collect();
                if points.len() >= 2 {
                    painter.add(Shape::line(points, Stroke::new(1.5, color)));
                }
            }
        }

        response
    }
}

/// Triangle strip between `points` and the horizontal line `floor`.
fn fill_under(points: &[Pos2], floor: f32, color: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    for p in points {
        mesh.colored_vertex(*p, color);
        mesh.colored_vertex(pos2(p.x, floor), color);
    }
    for i in 0..points.len().saturating_sub(1) as u32 {
        let a = i * 2;
        mesh.add_triangle(a, a + 1, a + 2);
        mesh.add_triangle(a + 1, a + 3, a + 2);
    }
    mesh
}
