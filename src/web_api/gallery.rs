//! Gallery page rendering

use std::fmt::Write;

/// Render the gallery page from an already newest-first list of image names.
///
/// Pure function of its input; names come from the store's listing and are
/// therefore timestamp-shaped, so no HTML escaping is needed.
pub fn render(images: &[String]) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Plant Cam</title>\n\
         <style>\n\
         body { font-family: sans-serif; margin: 2rem; }\n\
         figure { display: inline-block; margin: 0.5rem; }\n\
         img { max-width: 320px; }\n\
         figcaption { font-size: 0.8rem; text-align: center; }\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <h1>Plant Cam</h1>\n",
    );

    match images.first() {
        Some(newest) => {
            let _ = writeln!(
                page,
                "<p>{} images, newest: {}</p>",
                images.len(),
                newest
            );
            for name in images {
                let _ = writeln!(
                    page,
                    "<figure><img src=\"/images/{name}\" alt=\"{name}\" loading=\"lazy\">\
                     <figcaption>{name}</figcaption></figure>"
                );
            }
        }
        None => page.push_str("<p>No images captured yet.</p>\n"),
    }

    page.push_str("</body>\n</html>\n");
    page
}
