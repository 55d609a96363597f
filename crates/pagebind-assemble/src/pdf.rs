//! Multi-page PDF generation
//!
//! Builds the output document with `pdf-writer`: a catalog, one pages tree,
//! and per page a page object, a content stream, and a DCT-encoded image
//! XObject. The content stream positions the image with the `PageSpec`
//! transform so it lands scaled and centered on the sheet.

use crate::page::PageRender;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

const IMAGE_NAME: Name<'static> = Name(b"Im0");

/// Objects per page: page, contents, image XObject.
const OBJS_PER_PAGE: usize = 3;

/// Serialize the rendered pages into PDF bytes, in input order.
///
/// The caller guarantees at least one page; a document with an empty page
/// tree is not a useful artifact and is rejected upstream.
#[must_use]
pub fn generate_pdf(pages: &[PageRender]) -> Vec<u8> {
    let mut pdf = Pdf::new();

    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let page_refs: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new((3 + i * OBJS_PER_PAGE) as i32))
        .collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_refs.iter().copied())
        .count(pages.len() as i32);

    for (i, page) in pages.iter().enumerate() {
        let base = 3 + i * OBJS_PER_PAGE;
        write_page(
            &mut pdf,
            page,
            Ref::new(base as i32),
            pages_id,
            Ref::new((base + 1) as i32),
            Ref::new((base + 2) as i32),
        );
    }

    pdf.finish()
}

fn write_page(
    pdf: &mut Pdf,
    page: &PageRender,
    page_id: Ref,
    pages_id: Ref,
    contents_id: Ref,
    image_id: Ref,
) {
    let mut image = pdf.image_xobject(image_id, &page.jpeg);
    image.filter(Filter::DctDecode);
    image.width(page.width as i32);
    image.height(page.height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    // The unit image square is mapped to the draw rectangle; PDF origin is
    // bottom-left, which is exactly where the centering offsets point.
    let spec = page.spec;
    let mut content = Content::new();
    content.save_state();
    content.transform([
        spec.draw_width as f32,
        0.0,
        0.0,
        spec.draw_height as f32,
        spec.offset_x as f32,
        spec.offset_y as f32,
    ]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(contents_id, &content.finish());

    let mut page_obj = pdf.page(page_id);
    page_obj.parent(pages_id);
    page_obj.media_box(Rect::new(
        0.0,
        0.0,
        spec.page_width as f32,
        spec.page_height as f32,
    ));
    page_obj.contents(contents_id);
    page_obj.resources().x_objects().pair(IMAGE_NAME, image_id);
    page_obj.finish();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebind_core::plan_page;

    fn fake_page(width: u32, height: u32) -> PageRender {
        PageRender {
            // Not a decodable JPEG, but generation only embeds the bytes.
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width,
            height,
            spec: plan_page(width, height),
        }
    }

    fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle)
            .count()
    }

    #[test]
    fn test_single_page_document() {
        let data = generate_pdf(&[fake_page(700, 1000)]);
        assert!(data.starts_with(b"%PDF-"));
        assert_eq!(count_occurrences(&data, b"/MediaBox"), 1);
        assert!(count_occurrences(&data, b"/DCTDecode") >= 1);
    }

    #[test]
    fn test_page_count_matches_input() {
        let pages = vec![fake_page(1000, 700), fake_page(700, 1000), fake_page(500, 500)];
        let data = generate_pdf(&pages);
        assert_eq!(count_occurrences(&data, b"/MediaBox"), 3);
        assert_eq!(count_occurrences(&data, b"/Count 3"), 1);
    }

    #[test]
    fn test_pages_keep_input_order() {
        // Landscape first, portrait second: the first MediaBox is wider
        // than tall, the second taller than wide.
        let data = generate_pdf(&[fake_page(1000, 700), fake_page(700, 1000)]);
        let text = String::from_utf8_lossy(&data);
        let first = text.find("/MediaBox").unwrap();
        let second = text[first + 1..].find("/MediaBox").unwrap() + first + 1;
        let box_of = |start: usize| {
            let open = text[start..].find('[').unwrap() + start;
            let close = text[open..].find(']').unwrap() + open;
            let nums: Vec<f32> = text[open + 1..close]
                .split_whitespace()
                .map(|n| n.parse().unwrap())
                .collect();
            (nums[2], nums[3])
        };
        let (w1, h1) = box_of(first);
        let (w2, h2) = box_of(second);
        assert!(w1 > h1, "first page should be landscape");
        assert!(h2 > w2, "second page should be portrait");
    }
}
