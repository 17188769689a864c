use crate::camera3d::Camera3D;
use crate::debug_draw::{Color, DebugDrawList};
use crate::hud::HudLabel;
use anyhow::Result;
use egui::{Align2, Color32, FontId, LayerId, Pos2, Shape, Stroke};
use egui_wgpu::{Renderer as EguiRenderer, ScreenDescriptor};
use winit::dpi::PhysicalSize;

use super::SurfaceFrame;

const LINE_WIDTH: f32 = 1.0;
const HUD_FONT_SIZE: f32 = 14.0;

pub fn to_color32(color: Color) -> Color32 {
    let [r, g, b, a] = color.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Projects the collected world-space primitives to screen shapes. Primitives with a vertex
/// behind the camera are dropped.
pub fn project_primitives(camera: &Camera3D, viewport: PhysicalSize<u32>, list: &DebugDrawList) -> Vec<Shape> {
    let project = |p| camera.project_point(p, viewport).map(|s| Pos2::new(s.x, s.y));
    let mut shapes = Vec::with_capacity(list.lines.len() + list.triangles.len());
    for triangle in &list.triangles {
        let points: Option<Vec<Pos2>> = triangle.points.iter().map(|p| project(*p)).collect();
        if let Some(points) = points {
            shapes.push(Shape::convex_polygon(points, to_color32(triangle.color), Stroke::NONE));
        }
    }
    for line in &list.lines {
        if let (Some(a), Some(b)) = (project(line.a), project(line.b)) {
            shapes.push(Shape::line_segment([a, b], Stroke::new(LINE_WIDTH, to_color32(line.color))));
        }
    }
    shapes
}

/// Paints debug geometry first and HUD text over it, in the background layer.
pub fn paint_overlay(
    ctx: &egui::Context,
    camera: &Camera3D,
    viewport: PhysicalSize<u32>,
    list: &DebugDrawList,
    labels: &[HudLabel],
) {
    let painter = ctx.layer_painter(LayerId::background());
    painter.extend(project_primitives(camera, viewport, list));
    for label in labels {
        painter.text(
            Pos2::new(label.position.x, label.position.y),
            Align2::LEFT_TOP,
            &label.text,
            FontId::monospace(HUD_FONT_SIZE),
            to_color32(label.color),
        );
    }
}

pub fn render(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    painter: &mut EguiRenderer,
    paint_jobs: &[egui::ClippedPrimitive],
    screen: &ScreenDescriptor,
    frame: SurfaceFrame,
    background: Color,
) -> Result<()> {
    let view = frame.view();
    let mut encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Overlay Encoder") });
    let mut extra_cmd = painter.update_buffers(device, queue, &mut encoder, paint_jobs, screen);
    let clear = wgpu::Color {
        r: background.x as f64,
        g: background.y as f64,
        b: background.z as f64,
        a: background.w as f64,
    };
    {
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Clear(clear), store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            })
            .forget_lifetime();
        painter.render(&mut pass, paint_jobs, screen);
    }
    extra_cmd.push(encoder.finish());
    queue.submit(extra_cmd);
    frame.present();
    Ok(())
}
