use image::{Rgba, RgbaImage};
use qrlogo::{
    Color, Compositor, EncodeError, LogoImage, PassOutcome, Preview, QrCodeEcc, Rect,
    RenderError, RenderParams, RenderSpec,
};

fn decode_symbol(raster: &RgbaImage) -> Option<String> {
    let (width, height) = raster.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            let Rgba([r, g, b, _]) = *raster.get_pixel(x as u32, y as u32);
            ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
        });
    let grids = prepared.detect_grids();
    let grid = grids.first()?;
    grid.decode().ok().map(|(_meta, content)| content)
}

/// Bounding box of pixels matching the placeholder color.
fn ink_bounds(raster: &RgbaImage, within: Rect) -> Option<Rect> {
    let ink = Color::rgb(0x11, 0x18, 0x27).to_rgba();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in raster.enumerate_pixels() {
        if !within.contains(x, y) || *pixel != ink {
            continue;
        }
        let b = bounds.get_or_insert((x, y, x, y));
        b.0 = b.0.min(x);
        b.1 = b.1.min(y);
        b.2 = b.2.max(x);
        b.3 = b.3.max(y);
    }
    bounds.map(|(x0, y0, x1, y1)| Rect {
        x: x0,
        y: y0,
        width: x1 - x0 + 1,
        height: y1 - y0 + 1,
    })
}

#[test]
fn default_render_places_placeholder_in_rounded_knockout() {
    let params = RenderParams {
        payload: "https://example.com".to_string(),
        side: 512,
        correction_level: QrCodeEcc::High,
        ..RenderParams::default()
    };
    let spec = RenderSpec::new(&params, None);
    let raster = Compositor::new().render(&spec).unwrap();

    let knockout = spec.knockout();
    assert_eq!((knockout.x, knockout.y), (185, 185));
    assert_eq!((knockout.width, knockout.height), (142, 142));
    assert_eq!(spec.corner_radius(), 11);

    let logo_area = Rect {
        x: 205,
        y: 205,
        width: 102,
        height: 102,
    };
    let ink = ink_bounds(&raster, knockout).expect("placeholder drawn");
    assert!(logo_area.contains(ink.x, ink.y));
    assert!(logo_area.contains(ink.right() - 1, ink.bottom() - 1));
    let center_x = ink.x + ink.width / 2;
    let center_y = ink.y + ink.height / 2;
    assert!(center_x.abs_diff(256) <= 2, "center x {center_x}");
    assert!(center_y.abs_diff(256) <= 2, "center y {center_y}");

    assert_eq!(decode_symbol(&raster).as_deref(), Some("https://example.com"));
}

#[test]
fn small_overlay_symbol_still_decodes() {
    let params = RenderParams {
        logo_percent: 10,
        knockout_percent: 2,
        ..RenderParams::default()
    };
    let raster = Compositor::new()
        .render(&RenderSpec::new(&params, None))
        .unwrap();
    assert_eq!(decode_symbol(&raster).as_deref(), Some("https://example.com"));
}

#[test]
fn default_controls_decode_across_sizes() {
    for side in [256, 512, 1024] {
        for logo_percent in [10, 20, 25] {
            let params = RenderParams {
                side,
                logo_percent,
                ..RenderParams::default()
            };
            let raster = Compositor::new()
                .render(&RenderSpec::new(&params, None))
                .unwrap();
            assert_eq!(
                decode_symbol(&raster).as_deref(),
                Some("https://example.com"),
                "side {side} logo {logo_percent}%"
            );
        }
    }
}

#[test]
fn empty_payload_renders_trivial_symbol() {
    let params = RenderParams {
        payload: String::new(),
        ..RenderParams::default()
    };
    let raster = Compositor::new()
        .render(&RenderSpec::new(&params, None))
        .unwrap();
    assert_eq!(raster.dimensions(), (512, 512));
}

#[test]
fn over_capacity_at_low_level_keeps_previous_raster() {
    let mut preview = Preview::default();
    assert_eq!(preview.refresh().unwrap(), PassOutcome::Committed);
    let before = preview.export_png().unwrap();

    preview.set_correction_level(QrCodeEcc::Low);
    preview.set_payload("z".repeat(3500));
    match preview.refresh() {
        Err(RenderError::Encode(EncodeError::DataTooLong { level, .. })) => assert_eq!(level, 'L'),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(preview.export_png().unwrap(), before);
    assert!(preview.notice().is_some());
}

#[test]
fn identical_specs_render_identical_bytes() {
    let logo = LogoImage::from_rgba(RgbaImage::from_fn(40, 24, |x, y| {
        Rgba([(x * 6) as u8, (y * 10) as u8, 90, 255])
    }))
    .unwrap();
    let params = RenderParams {
        payload: "idempotent".to_string(),
        foreground: Color::rgb(20, 40, 80),
        background: Color::rgb(250, 250, 240),
        logo_percent: 25,
        knockout_percent: 6,
        ..RenderParams::default()
    };
    let compositor = Compositor::new();
    let first = compositor.render(&RenderSpec::new(&params, Some(&logo))).unwrap();
    let second = compositor.render(&RenderSpec::new(&params, Some(&logo))).unwrap();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn config_json_drives_preview() {
    let params = RenderParams::from_json(
        r##"{"payload": "HELLO", "side": 320, "margin": 0, "correctionLevel": "Q", "showGuide": false}"##,
    )
    .unwrap();
    params.validate().unwrap();
    let mut preview = Preview::new(params);
    preview.refresh().unwrap();
    let raster = preview.raster().unwrap();
    assert_eq!(raster.dimensions(), (320, 320));
    // no quiet zone: the finder pattern starts at the very corner
    assert_eq!(*raster.get_pixel(0, 0), Color::BLACK.to_rgba());
}
