use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;

use clap::Parser;
use crossbeam_channel::Receiver;
use eframe::egui;
use log::{error, info};

use pico_composite::scene::Scene;
use pico_composite::screenshot::save_png;
use pico_composite::sim::{FieldImage, ScanOut};
use pico_composite::video::standard::Mode;
use pico_composite::video::{Video, VideoConfig};

/// Composite video generator running against a simulated monitor.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Resolution mode: 0 = 256x240, 1 = 320x240, 2 = 640x240.
    #[arg(long, default_value_t = 0)]
    mode: u8,

    /// Border colour index.
    #[arg(long, default_value_t = 0)]
    border: u8,

    /// Fields to scan before exiting when headless.
    #[arg(long, default_value_t = 50)]
    fields: u32,

    /// PNG written with the last field (headless) or on the S key.
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Run without a window.
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mode = Mode::try_from(args.mode)?;
    let (mut video, engine) = Video::new(VideoConfig {
        mode,
        ..VideoConfig::default()
    });
    video.set_border_colour(args.border)?;

    let scan = ScanOut::new(engine);
    let stop = scan.stop_flag();
    let (field_tx, field_rx) = crossbeam_channel::bounded(1);
    let scan_thread = thread::spawn(move || scan.run(field_tx));

    // Application loop: draw the back buffer, wait for vblank, swap.
    thread::spawn(move || {
        let mut scene = Scene::new();
        loop {
            scene.draw(&mut video.canvas());
            video.wait_vblank();
            video.swap();
        }
    });

    if args.headless {
        let mut last = None;
        for _ in 0..args.fields {
            last = Some(field_rx.recv()?);
        }
        stop.store(true, Ordering::Relaxed);
        drop(field_rx);
        scan_thread.join().map_err(|_| "scan-out thread panicked")?;

        if let (Some(path), Some(field)) = (args.screenshot, last) {
            save_png(&path, &field)?;
            info!("saved {}x{} field to {}", field.width, field.height, path.display());
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 600.0])
            .with_title("pico-composite"),
        ..Default::default()
    };
    let screenshot = args.screenshot;
    eframe::run_native(
        "pico-composite",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(Monitor {
                fields: field_rx,
                latest: None,
                texture: None,
                screenshot,
            }))
        }),
    )?;
    stop.store(true, Ordering::Relaxed);
    Ok(())
}

/// Window showing the most recent scanned field.
struct Monitor {
    fields: Receiver<FieldImage>,
    latest: Option<FieldImage>,
    texture: Option<egui::TextureHandle>,
    screenshot: Option<PathBuf>,
}

impl Monitor {
    fn save(&self) {
        let (Some(path), Some(field)) = (&self.screenshot, &self.latest) else {
            return;
        };
        match save_png(path, field) {
            Ok(()) => info!("saved field to {}", path.display()),
            Err(e) => error!("screenshot failed: {}", e),
        }
    }
}

impl eframe::App for Monitor {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(field) = self.fields.try_iter().last() {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [field.width, field.height],
                field.as_bytes(),
            );
            match &mut self.texture {
                Some(tex) => tex.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.texture =
                        Some(ctx.load_texture("field", image, egui::TextureOptions::NEAREST));
                }
            }
            self.latest = Some(field);
        }

        if ctx.input(|i| i.key_pressed(egui::Key::S)) {
            Monitor::save(self);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tex) = &self.texture {
                // Pixels are wide on a 4:3 monitor; stretch to the window.
                ui.add(egui::Image::from_texture(tex).fit_to_exact_size(ui.available_size()));
            }
        });

        ctx.request_repaint();
    }
}
