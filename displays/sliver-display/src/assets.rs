//! Flash-backed asset source
//!
//! Images are stored as raw big-endian RGB565 rows in a `ReadStorage`
//! device (typically external SPI flash). Opening an image does no I/O: each
//! `run()` of the returned reader reads and pushes at most `ROWS_PER_RUN`
//! rows. Text is rendered from `embedded-graphics` mono fonts, at most
//! `GLYPHS_PER_RUN` glyphs per `run()`.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_graphics::geometry::Dimensions;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_storage::ReadStorage;
use heapless::{String, Vec};

use sliver_core::elements::MAX_TEXT_LEN;
use sliver_core::geometry::{Color, Point as CorePoint, Rect, Size as CoreSize};
use sliver_core::traits::{
    AssetReader, AssetSource, FontId, FontMetrics, ImageId, StreamStatus, Surface, TextRun,
};

use crate::surface::{to_rectangle, to_rgb};

/// Image rows read per `run()`
pub const ROWS_PER_RUN: u16 = 8;

/// Glyphs rendered per `run()`
pub const GLYPHS_PER_RUN: usize = 8;

/// Maximum registered images
pub const MAX_IMAGES: usize = 32;

/// Maximum registered fonts
pub const MAX_FONTS: usize = 4;

/// Pixels read from storage at once
const CHUNK_PIXELS: usize = 32;

/// Size of one image table record in storage
pub const IMAGE_RECORD_SIZE: usize = 10;

/// Asset registration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssetError {
    /// Storage read failed
    StorageRead,
    /// Image or font table is full
    TableFull,
    /// Image data extends past the end of storage
    OutOfBounds,
}

/// Location of one raw RGB565 image in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageEntry {
    pub id: ImageId,
    /// Byte offset of the first pixel
    pub offset: u32,
    pub width: u16,
    pub height: u16,
}

impl ImageEntry {
    /// Byte length of the pixel data
    pub fn byte_len(&self) -> u32 {
        self.width as u32 * self.height as u32 * 2
    }

    /// Decode a table record: id, offset, width, height (big-endian)
    pub fn from_record(record: &[u8; IMAGE_RECORD_SIZE]) -> Self {
        Self {
            id: ImageId(u16::from_be_bytes([record[0], record[1]])),
            offset: u32::from_be_bytes([record[2], record[3], record[4], record[5]]),
            width: u16::from_be_bytes([record[6], record[7]]),
            height: u16::from_be_bytes([record[8], record[9]]),
        }
    }
}

#[derive(Clone, Copy)]
struct FontEntry {
    id: FontId,
    font: &'static MonoFont<'static>,
}

/// Asset source over a shared storage device
pub struct FlashAssets<'a, S> {
    storage: &'a RefCell<S>,
    images: Vec<ImageEntry, MAX_IMAGES>,
    fonts: Vec<FontEntry, MAX_FONTS>,
}

impl<'a, S: ReadStorage> FlashAssets<'a, S> {
    pub fn new(storage: &'a RefCell<S>) -> Self {
        Self {
            storage,
            images: Vec::new(),
            fonts: Vec::new(),
        }
    }

    /// Register an image stored at `entry.offset`
    pub fn add_image(&mut self, entry: ImageEntry) -> Result<(), AssetError> {
        let capacity = self
            .storage
            .try_borrow()
            .map_err(|_| AssetError::StorageRead)?
            .capacity() as u64;
        if entry.offset as u64 + entry.byte_len() as u64 > capacity {
            warn!("image {} exceeds storage", entry.id.0);
            return Err(AssetError::OutOfBounds);
        }
        if let Some(existing) = self.images.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
            return Ok(());
        }
        self.images.push(entry).map_err(|_| AssetError::TableFull)
    }

    /// Register `count` images from a table of records at `offset`
    ///
    /// Returns the number of images registered.
    pub fn load_image_table(&mut self, offset: u32, count: u16) -> Result<usize, AssetError> {
        let mut loaded = 0;
        for i in 0..count as u32 {
            let mut record = [0u8; IMAGE_RECORD_SIZE];
            self.storage
                .try_borrow_mut()
                .map_err(|_| AssetError::StorageRead)?
                .read(offset + i * IMAGE_RECORD_SIZE as u32, &mut record)
                .map_err(|_| AssetError::StorageRead)?;
            self.add_image(ImageEntry::from_record(&record))?;
            loaded += 1;
        }
        debug!("loaded {} images from table at {:#x}", loaded, offset);
        Ok(loaded)
    }

    /// Register a mono font under `id`
    pub fn add_font(&mut self, id: FontId, font: &'static MonoFont<'static>) -> Result<(), AssetError> {
        if let Some(existing) = self.fonts.iter_mut().find(|e| e.id == id) {
            existing.font = font;
            return Ok(());
        }
        self.fonts
            .push(FontEntry { id, font })
            .map_err(|_| AssetError::TableFull)
    }

    fn image(&self, id: ImageId) -> Option<&ImageEntry> {
        self.images.iter().find(|e| e.id == id)
    }

    fn font(&self, id: FontId) -> Option<&'static MonoFont<'static>> {
        self.fonts.iter().find(|e| e.id == id).map(|e| e.font)
    }
}

impl<'a, S: ReadStorage> AssetSource for FlashAssets<'a, S> {
    type Reader = FlashReader<'a, S>;

    fn image_size(&self, image: ImageId) -> Option<CoreSize> {
        self.image(image)
            .map(|e| CoreSize::new(e.width as u32, e.height as u32))
    }

    fn open_image(&mut self, image: ImageId, origin: CorePoint, clip: Rect) -> Option<Self::Reader> {
        let entry = *self.image(image)?;
        Some(FlashReader::Image(ImageStream::new(
            self.storage,
            entry,
            origin,
            clip,
        )))
    }

    fn font_metrics(&self, font: FontId) -> Option<FontMetrics> {
        let font = self.font(font)?;
        Some(FontMetrics {
            advance: (font.character_size.width + font.character_spacing) as u16,
            line_height: font.character_size.height as u16,
        })
    }

    fn open_text(&mut self, run: &TextRun<'_>) -> Option<Self::Reader> {
        let font = self.font(run.font)?;
        Some(FlashReader::Text(TextStream::new(font, run)))
    }
}

/// Reader handed out by [`FlashAssets`]
pub enum FlashReader<'a, S> {
    Image(ImageStream<'a, S>),
    Text(TextStream),
}

impl<S: ReadStorage> AssetReader for FlashReader<'_, S> {
    fn status(&self) -> StreamStatus {
        match self {
            FlashReader::Image(stream) => stream.status(),
            FlashReader::Text(stream) => stream.status(),
        }
    }

    fn run(&mut self, surface: &mut dyn Surface) {
        match self {
            FlashReader::Image(stream) => stream.run(surface),
            FlashReader::Text(stream) => stream.run(surface),
        }
    }
}

/// Row-by-row image transfer
pub struct ImageStream<'a, S> {
    storage: &'a RefCell<S>,
    entry: ImageEntry,
    origin: CorePoint,
    /// Visible part of the image, in image coordinates
    visible: Option<Rect>,
    next_row: u16,
}

impl<'a, S: ReadStorage> ImageStream<'a, S> {
    fn new(storage: &'a RefCell<S>, entry: ImageEntry, origin: CorePoint, clip: Rect) -> Self {
        let bounds = Rect::from_origin(
            origin,
            CoreSize::new(entry.width as u32, entry.height as u32),
        );
        let visible = bounds
            .intersection(&clip)
            .map(|r| Rect::new(r.x - origin.x, r.y - origin.y, r.width, r.height));
        let next_row = visible.map_or(0, |v| v.y as u16);
        Self {
            storage,
            entry,
            origin,
            visible,
            next_row,
        }
    }

    fn status(&self) -> StreamStatus {
        match self.visible {
            Some(v) if (self.next_row as i32) < v.bottom() => StreamStatus::Pending,
            _ => StreamStatus::Finished,
        }
    }

    fn run(&mut self, surface: &mut dyn Surface) {
        let Some(visible) = self.visible else {
            return;
        };
        // Another reader holds the device: retry on the next run
        let Ok(mut storage) = self.storage.try_borrow_mut() else {
            return;
        };

        let end = (visible.bottom() as u16).min(self.next_row.saturating_add(ROWS_PER_RUN));
        while self.next_row < end {
            let row = self.next_row;
            if read_row(&mut *storage, &self.entry, row, visible, self.origin, surface).is_err() {
                warn!("image {} read failed at row {}", self.entry.id.0, row);
                self.visible = None;
                return;
            }
            self.next_row += 1;
        }
    }
}

/// Push the visible span of one row in chunks
fn read_row<S: ReadStorage>(
    storage: &mut S,
    entry: &ImageEntry,
    row: u16,
    visible: Rect,
    origin: CorePoint,
    surface: &mut dyn Surface,
) -> Result<(), S::Error> {
    let mut bytes = [0u8; CHUNK_PIXELS * 2];
    let mut pixels = [Color::BLACK; CHUNK_PIXELS];

    let mut x = visible.x as u32;
    let end = visible.right() as u32;
    while x < end {
        let n = ((end - x) as usize).min(CHUNK_PIXELS);
        let offset = entry.offset + (row as u32 * entry.width as u32 + x) * 2;
        storage.read(offset, &mut bytes[..n * 2])?;
        for (pixel, raw) in pixels.iter_mut().zip(bytes.chunks_exact(2)).take(n) {
            *pixel = Color::from_rgb565(u16::from_be_bytes([raw[0], raw[1]]));
        }
        surface.draw_run(
            CorePoint::new(origin.x + x as i32, origin.y + row as i32),
            &pixels[..n],
        );
        x += n as u32;
    }
    Ok(())
}

/// Glyph-by-glyph text transfer
pub struct TextStream {
    font: &'static MonoFont<'static>,
    text: String<MAX_TEXT_LEN>,
    origin: CorePoint,
    color: Color,
    clip: Rect,
    /// Byte offset of the next glyph
    next: usize,
    /// Glyphs drawn so far
    drawn: u32,
}

impl TextStream {
    fn new(font: &'static MonoFont<'static>, run: &TextRun<'_>) -> Self {
        let mut text = String::new();
        for ch in run.text.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        Self {
            font,
            text,
            origin: run.origin,
            color: run.color,
            clip: run.clip,
            next: 0,
            drawn: 0,
        }
    }

    fn status(&self) -> StreamStatus {
        if self.next >= self.text.len() {
            StreamStatus::Finished
        } else {
            StreamStatus::Pending
        }
    }

    fn run(&mut self, surface: &mut dyn Surface) {
        let style = MonoTextStyle::new(self.font, to_rgb(self.color));
        let advance = (self.font.character_size.width + self.font.character_spacing) as i32;
        let mut target = SurfaceTarget {
            surface,
            clip: to_rectangle(self.clip),
        };

        let rest = &self.text[self.next..];
        for ch in rest.chars().take(GLYPHS_PER_RUN) {
            let x = self.origin.x + self.drawn as i32 * advance;
            let mut buf = [0u8; 4];
            let glyph = ch.encode_utf8(&mut buf);
            let position = Point::new(x, self.origin.y);
            // Drawing into the surface adapter cannot fail
            let _ = Text::with_baseline(glyph, position, style, Baseline::Top).draw(&mut target);
            self.next += ch.len_utf8();
            self.drawn += 1;
        }
    }
}

/// `DrawTarget` forwarding pixels to a pipeline surface
struct SurfaceTarget<'s> {
    surface: &'s mut dyn Surface,
    clip: Rectangle,
}

impl Dimensions for SurfaceTarget<'_> {
    fn bounding_box(&self) -> Rectangle {
        self.clip
    }
}

impl DrawTarget for SurfaceTarget<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if self.clip.contains(point) {
                let color = Color::rgb(color.r(), color.g(), color.b());
                self.surface.draw_run(CorePoint::new(point.x, point.y), &[color]);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.clip);
        if !area.is_zero_sized() {
            self.surface.fill_rect(
                Rect::new(area.top_left.x, area.top_left.y, area.size.width, area.size.height),
                Color::rgb(color.r(), color.g(), color.b()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::GraphicsSurface;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::mono_font::ascii::FONT_6X10;
    use embedded_graphics::pixelcolor::Rgb565;

    /// Byte array standing in for external flash
    struct MemStorage {
        data: std::vec::Vec<u8>,
        reads: usize,
    }

    impl MemStorage {
        fn new(data: std::vec::Vec<u8>) -> RefCell<Self> {
            RefCell::new(Self { data, reads: 0 })
        }
    }

    impl ReadStorage for MemStorage {
        type Error = ();

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), ()> {
            let start = offset as usize;
            let src = self.data.get(start..start + bytes.len()).ok_or(())?;
            bytes.copy_from_slice(src);
            self.reads += 1;
            Ok(())
        }

        fn capacity(&self) -> usize {
            self.data.len()
        }
    }

    fn surface() -> GraphicsSurface<MockDisplay<Rgb565>> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        GraphicsSurface::new(display)
    }

    /// Solid red image, `width` x `height`, at offset 0
    fn red_image(width: u16, height: u16) -> std::vec::Vec<u8> {
        let red = 0xF800u16.to_be_bytes();
        red.iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 2)
            .collect()
    }

    const IMAGE: ImageId = ImageId(7);

    fn entry(width: u16, height: u16) -> ImageEntry {
        ImageEntry {
            id: IMAGE,
            offset: 0,
            width,
            height,
        }
    }

    #[test]
    fn test_open_does_no_io() {
        let storage = MemStorage::new(red_image(4, 4));
        let mut assets = FlashAssets::new(&storage);
        assets.add_image(entry(4, 4)).unwrap();

        let reader = assets
            .open_image(IMAGE, CorePoint::new(0, 0), Rect::new(0, 0, 64, 64))
            .unwrap();

        assert_eq!(reader.status(), StreamStatus::Pending);
        assert_eq!(storage.borrow().reads, 0);
    }

    #[test]
    fn test_image_streams_in_row_batches() {
        let storage = MemStorage::new(red_image(4, 10));
        let mut assets = FlashAssets::new(&storage);
        assets.add_image(entry(4, 10)).unwrap();
        let mut surface = surface();

        let mut reader = assets
            .open_image(IMAGE, CorePoint::new(2, 2), Rect::new(0, 0, 64, 64))
            .unwrap();

        reader.run(&mut surface);
        assert_eq!(reader.status(), StreamStatus::Pending);
        assert_eq!(surface.target().get_pixel(Point::new(2, 9)), Some(Rgb565::RED));
        assert_eq!(surface.target().get_pixel(Point::new(2, 10)), None);

        reader.run(&mut surface);
        assert!(reader.is_finished());
        assert_eq!(surface.target().get_pixel(Point::new(5, 11)), Some(Rgb565::RED));
    }

    #[test]
    fn test_clipped_image_reads_visible_rows_only() {
        let storage = MemStorage::new(red_image(4, 20));
        let mut assets = FlashAssets::new(&storage);
        assets.add_image(entry(4, 20)).unwrap();
        let mut surface = surface();

        // Only rows 5..7 of the image are visible
        let mut reader = assets
            .open_image(IMAGE, CorePoint::new(0, 0), Rect::new(0, 5, 64, 2))
            .unwrap();
        reader.run(&mut surface);

        assert!(reader.is_finished());
        assert_eq!(storage.borrow().reads, 2);
    }

    #[test]
    fn test_image_outside_clip_finishes_immediately() {
        let storage = MemStorage::new(red_image(4, 4));
        let mut assets = FlashAssets::new(&storage);
        assets.add_image(entry(4, 4)).unwrap();

        let reader = assets
            .open_image(IMAGE, CorePoint::new(0, 0), Rect::new(30, 30, 4, 4))
            .unwrap();

        assert!(reader.is_finished());
    }

    #[test]
    fn test_image_past_storage_rejected() {
        let storage = MemStorage::new(red_image(4, 4));
        let mut assets = FlashAssets::new(&storage);

        assert_eq!(assets.add_image(entry(4, 5)), Err(AssetError::OutOfBounds));
        assert!(assets.image_size(IMAGE).is_none());
    }

    #[test]
    fn test_load_image_table() {
        let mut data = std::vec::Vec::new();
        for (id, offset) in [(1u16, 20u32), (2, 28)] {
            data.extend_from_slice(&id.to_be_bytes());
            data.extend_from_slice(&offset.to_be_bytes());
            data.extend_from_slice(&2u16.to_be_bytes());
            data.extend_from_slice(&2u16.to_be_bytes());
        }
        data.extend(red_image(2, 4));
        let storage = MemStorage::new(data);
        let mut assets = FlashAssets::new(&storage);

        assert_eq!(assets.load_image_table(0, 2), Ok(2));
        assert_eq!(assets.image_size(ImageId(2)), Some(CoreSize::new(2, 2)));
    }

    #[test]
    fn test_text_streams_glyph_batches() {
        let storage = MemStorage::new(std::vec::Vec::new());
        let mut assets = FlashAssets::new(&storage);
        assets.add_font(FontId(0), &FONT_6X10).unwrap();
        let mut surface = surface();

        assert_eq!(
            assets.font_metrics(FontId(0)),
            Some(FontMetrics {
                advance: 6,
                line_height: 10
            })
        );

        let run = TextRun {
            font: FontId(0),
            text: "ABCDEFGHIJ",
            origin: CorePoint::new(0, 0),
            color: Color::WHITE,
            clip: Rect::new(0, 0, 64, 64),
        };
        let mut reader = assets.open_text(&run).unwrap();

        reader.run(&mut surface);
        assert_eq!(reader.status(), StreamStatus::Pending);
        let first = surface.target().affected_area();
        assert!(first.size.width > 0 && first.bottom_right().unwrap().x < 48);

        reader.run(&mut surface);
        assert!(reader.is_finished());
        assert!(surface.target().affected_area().bottom_right().unwrap().x >= 48);
    }

    #[test]
    fn test_unknown_assets() {
        let storage = MemStorage::new(std::vec::Vec::new());
        let mut assets = FlashAssets::new(&storage);

        assert!(assets.image_size(IMAGE).is_none());
        assert!(assets
            .open_image(IMAGE, CorePoint::new(0, 0), Rect::new(0, 0, 8, 8))
            .is_none());
        assert!(assets.font_metrics(FontId(3)).is_none());
    }
}
