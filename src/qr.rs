//! QR codec: a room's canonical deep-link rendered scannable, one code at a
//! time for previews and 3x4 to an A4 page for the printable sheet. There is
//! no decode here; scanning the code just opens the URL, which lands back on
//! the room route.

use std::io::Cursor;

use image::{GrayImage, Luma};
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use qrcode::{Color, QrCode};

use crate::{store::RoomRow, AppResult};

pub const QR_WIDTH: u32 = 200;
pub const QR_MARGIN: u32 = 1;

const COLS: usize = 3;
const ROWS: usize = 4;
pub const CELLS_PER_PAGE: usize = COLS * ROWS;

const PAGE_W_MM: f32 = 210.0;
const PAGE_H_MM: f32 = 297.0;
const QR_MM: f32 = 60.0;
const SHEET_MARGIN_MM: f32 = 20.0;

/// The deep-link contract with the room route: scanning a code opens
/// `{origin}/room/{id}`.
pub fn room_url(origin: &str, room_id: &str) -> String {
    format!("{}/room/{room_id}", origin.trim_end_matches('/'))
}

pub fn encode(text: &str) -> Result<GrayImage, qrcode::types::QrError> {
    encode_with(text, QR_WIDTH, QR_MARGIN)
}

/// Black-on-white QR raster, `margin` quiet modules on each side, scaled to
/// the largest whole-module size that fits `width` pixels.
pub fn encode_with(
    text: &str,
    width: u32,
    margin: u32,
) -> Result<GrayImage, qrcode::types::QrError> {
    let code = QrCode::new(text.as_bytes())?;
    let modules = code.width() as u32;
    let total = modules + 2 * margin;
    let scale = (width / total).max(1);
    let dim = total * scale;

    let mut img = GrayImage::from_pixel(dim, dim, Luma([0xff]));
    for y in 0..modules {
        for x in 0..modules {
            if code[(x as usize, y as usize)] == Color::Dark {
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel((margin + x) * scale + dx, (margin + y) * scale + dy, Luma([0x00]));
                    }
                }
            }
        }
    }
    Ok(img)
}

pub fn png_bytes(img: &GrayImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// 12 cells per page, partial last page, no pages for no rooms.
pub fn paginate(rooms: &[RoomRow]) -> Vec<&[RoomRow]> {
    rooms.chunks(CELLS_PER_PAGE).collect()
}

/// The printable A4 sheet: each cell is the room's QR code with the building
/// name and room number captioned under it.
pub fn render_sheet(rooms: &[RoomRow], origin: &str) -> AppResult<Vec<u8>> {
    let doc = PdfDocument::empty("xeless QR codes");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    for page_rooms in paginate(rooms) {
        let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W_MM), Mm(PAGE_H_MM), "qr");
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        for (i, room) in page_rooms.iter().enumerate() {
            let col = (i % COLS) as f32;
            let row = (i / COLS) as f32;
            let x = SHEET_MARGIN_MM + col * (QR_MM + 10.0);
            let y_top = SHEET_MARGIN_MM + row * (QR_MM + 25.0);
            // pdf coordinates grow upward
            let y = PAGE_H_MM - y_top - QR_MM;

            let img = encode(&room_url(origin, &room.id))?;
            let dpi = img.width() as f32 * 25.4 / QR_MM;
            let (w, h) = (img.width() as usize, img.height() as usize);
            let xobject = ImageXObject {
                width: Px(w),
                height: Px(h),
                color_space: ColorSpace::Greyscale,
                bits_per_component: ColorBits::Bit8,
                interpolate: false,
                image_data: img.into_raw(),
                image_filter: None,
                smask: None,
                clipping_bbox: None,
            };
            Image::from(xobject).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(x)),
                    translate_y: Some(Mm(y)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );

            let building = room.building_name.as_deref().unwrap_or("");
            layer.use_text(building, 10.0, Mm(x), Mm(y - 5.0), &font);
            layer.use_text(format!("Room {}", room.room_number), 10.0, Mm(x), Mm(y - 12.0), &font);
        }
    }

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(n: usize) -> RoomRow {
        RoomRow {
            id: format!("room-{n}"),
            room_number: format!("{n}"),
            building_name: Some("North Hall".to_owned()),
        }
    }

    #[test]
    fn deep_link_survives_any_room_id() {
        let origin = "https://clean.example.com";
        let id = "0195c2a4-7b1e-7c3d-9a6f-1234567890ab";
        let url = room_url(origin, id);
        assert_eq!(url.strip_prefix(origin), Some(format!("/room/{id}").as_str()));

        // trailing slash on the origin must not double up
        assert_eq!(room_url("https://clean.example.com/", "42"), url.replace(id, "42"));
    }

    #[test]
    fn encode_is_deterministic_and_monochrome() {
        let a = encode("https://clean.example.com/room/42").unwrap();
        let b = encode("https://clean.example.com/room/42").unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
        assert_eq!(a.width(), a.height());
        assert!(a.width() <= QR_WIDTH);
        assert!(a.pixels().all(|p| p.0[0] == 0x00 || p.0[0] == 0xff));
    }

    #[test]
    fn pagination_boundaries() {
        let none: Vec<RoomRow> = vec![];
        assert!(paginate(&none).is_empty());

        let twelve: Vec<_> = (0..12).map(room).collect();
        assert_eq!(paginate(&twelve).len(), 1);

        let thirteen: Vec<_> = (0..13).map(room).collect();
        let pages = paginate(&thirteen);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 12);
        assert_eq!(pages[1].len(), 1);
    }

    #[test]
    fn empty_sheet_is_still_a_document() {
        let bytes = render_sheet(&[], "https://clean.example.com").unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn sheet_renders_partial_page() {
        let rooms: Vec<_> = (0..5).map(room).collect();
        let bytes = render_sheet(&rooms, "https://clean.example.com").unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }
}
