//! Server-side rendering of the single page
//!
//! Every section reads from the catalog or from carousel snapshots taken by
//! the handler. Modal state comes in through [`Overlay`].

use std::time::Duration;

use chrono::{Datelike, Utc};

use crate::carousel::CarouselView;
use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::forms::{Field, FormData};
use crate::messaging;
use crate::modal::{BookingModal, ContactModal};
use crate::models::{HOVER_Z_INDEX, Review, TopDestination, TourPackage};

/// Which modal, if any, is shown on top of the page
#[derive(Debug, Default)]
pub enum Overlay<'a> {
    #[default]
    None,
    Contact {
        modal: &'a ContactModal,
        error: Option<String>,
    },
    Booking {
        index: usize,
        modal: &'a BookingModal,
        error: Option<String>,
    },
    Confirmation {
        message: String,
    },
}

/// Everything one render needs
pub struct Page<'a> {
    pub config: &'a SiteConfig,
    pub catalog: &'a Catalog,
    pub destinations: &'a CarouselView<TopDestination>,
    pub reviews: &'a CarouselView<Review>,
    pub gallery: &'a [String],
    pub overlay: Overlay<'a>,
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.clamp(1, 5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

impl Page<'_> {
    /// Render the full document
    pub fn render(&self) -> String {
        let business = escape(&self.config.contact.business_name);
        let mut html = String::with_capacity(32 * 1024);
        html.push_str(&format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{business}</title>\n\
             <link rel=\"stylesheet\" href=\"/css/site.css\">\n\
             <style>.collage-photo:hover {{ z-index: {HOVER_Z_INDEX} !important; }}</style>\n\
             </head>\n<body>\n"
        ));

        self.header(&mut html);
        self.hero(&mut html);
        html.push_str(&destinations_section(
            self.destinations,
            self.config.carousel.destinations.interval(),
        ));
        self.packages(&mut html);
        self.inclusions(&mut html);
        self.more_destinations(&mut html);
        self.collage(&mut html);
        html.push_str(&reviews_section(
            self.reviews,
            self.config.carousel.reviews.interval(),
        ));
        self.overlay(&mut html);

        html.push_str(&format!(
            "<a class=\"chat-button\" href=\"{}\" target=\"_blank\" rel=\"noopener\" \
             aria-label=\"Chat with us\">Chat</a>\n",
            escape(&messaging::chat_link(&self.config.contact))
        ));
        html.push_str(&format!(
            "<footer><p>&copy; {} {business}. All rights reserved.</p></footer>\n",
            Utc::now().year()
        ));
        html.push_str(CAROUSEL_SCRIPT);
        html.push_str("</body>\n</html>\n");
        html
    }

    fn header(&self, html: &mut String) {
        html.push_str(&format!(
            "<header class=\"site-header\">\n<a class=\"brand\" href=\"/\">{}</a>\n\
             <nav>\n<a href=\"#destinations\">Destinations</a>\n\
             <a href=\"#packages\">Packages</a>\n<a href=\"#gallery\">Gallery</a>\n\
             <a href=\"#reviews\">Reviews</a>\n\
             <a class=\"contact-link\" href=\"/?contact=open\">Contact</a>\n</nav>\n</header>\n",
            escape(&self.config.contact.business_name)
        ));
    }

    fn hero(&self, html: &mut String) {
        html.push_str(
            "<section class=\"hero\">\n<h1>Discover the Pearl of the Indian Ocean</h1>\n\
             <p>Handcrafted journeys through Sri Lanka's mountains, temples and coastline.</p>\n\
             <a class=\"button\" href=\"#packages\">Explore Packages</a>\n</section>\n",
        );
    }

    fn packages(&self, html: &mut String) {
        html.push_str("<section id=\"packages\" class=\"packages\">\n<h2>Tour Packages</h2>\n");
        for (index, package) in self.catalog.packages.iter().enumerate() {
            Self::package_card(html, index, package);
        }
        html.push_str("</section>\n");
    }

    fn package_card(html: &mut String, index: usize, package: &TourPackage) {
        html.push_str(&format!(
            "<article class=\"package-card\">\n<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n\
             <p class=\"package-location\">{}</p>\n<h3>{}</h3>\n\
             <p class=\"package-meta\">{} Days &middot; {}</p>\n\
             <p class=\"rating\" aria-label=\"{} out of 5 stars\">{}</p>\n\
             <p class=\"price\"><span class=\"current\">${}</span> <s>${}</s></p>\n\
             <p>{}</p>\n<ul class=\"highlights\">\n",
            escape(&package.image),
            escape(&package.title),
            escape(&package.location),
            escape(&package.title),
            package.days,
            escape(&package.people),
            package.stars(),
            stars(package.stars()),
            escape(&package.price),
            escape(&package.original_price),
            escape(&package.description)
        ));
        for highlight in &package.highlights {
            html.push_str(&format!("<li>{}</li>\n", escape(highlight)));
        }
        html.push_str("</ul>\n<details class=\"itinerary\">\n<summary>View Itinerary</summary>\n<ol>\n");
        for day in package.itinerary_days() {
            html.push_str(&format!(
                "<li><strong>{}</strong> {}</li>\n",
                escape(day.label),
                escape(day.description)
            ));
        }
        html.push_str(&format!(
            "</ol>\n</details>\n<a class=\"button book\" href=\"/packages/{index}/book\">Book Now</a>\n</article>\n"
        ));
    }

    fn inclusions(&self, html: &mut String) {
        let inclusions = &self.catalog.inclusions;
        if inclusions.included.is_empty() && inclusions.excluded.is_empty() {
            return;
        }
        html.push_str("<section class=\"inclusions\">\n<div>\n<h3>What's Included</h3>\n<ul>\n");
        for item in &inclusions.included {
            html.push_str(&format!("<li class=\"included\">{}</li>\n", escape(item)));
        }
        html.push_str("</ul>\n</div>\n<div>\n<h3>Not Included</h3>\n<ul>\n");
        for item in &inclusions.excluded {
            html.push_str(&format!("<li class=\"excluded\">{}</li>\n", escape(item)));
        }
        html.push_str("</ul>\n</div>\n</section>\n");
    }

    fn more_destinations(&self, html: &mut String) {
        html.push_str("<section class=\"more-destinations\">\n<h2>More Destinations</h2>\n<div class=\"grid\">\n");
        for destination in &self.catalog.more_destinations {
            html.push_str(&format!(
                "<article class=\"{}\">\n<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n\
                 <h3>{}</h3>\n<p>{}</p>\n</article>\n",
                destination.size.card_class(),
                escape(&destination.image),
                escape(&destination.name),
                escape(&destination.name),
                escape(&destination.location)
            ));
        }
        html.push_str("</div>\n</section>\n");
    }

    fn collage(&self, html: &mut String) {
        html.push_str("<section id=\"gallery\" class=\"gallery\">\n<h2>Gallery</h2>\n<div class=\"collage\">\n");
        for photo in &self.catalog.photos {
            html.push_str(&format!(
                "<figure class=\"collage-photo\" style=\"{}\">\n<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n\
                 <figcaption>{}</figcaption>\n</figure>\n",
                escape(&photo.placement.css()),
                escape(&photo.src),
                escape(&photo.alt),
                escape(&photo.alt)
            ));
        }
        html.push_str("</div>\n");
        if !self.gallery.is_empty() {
            html.push_str("<div class=\"gallery-grid\">\n");
            for src in self.gallery {
                html.push_str(&format!(
                    "<img src=\"{}\" alt=\"\" loading=\"lazy\">\n",
                    escape(src)
                ));
            }
            html.push_str("</div>\n");
        }
        html.push_str("</section>\n");
    }

    fn overlay(&self, html: &mut String) {
        match &self.overlay {
            Overlay::None => {}
            Overlay::Contact { modal, error } => {
                if let Some(form) = modal.form() {
                    html.push_str("<dialog class=\"modal contact-modal\" open>\n<h2>Contact Us</h2>\n");
                    error_alert(html, error.as_deref());
                    html.push_str("<form method=\"post\" action=\"/contact\" target=\"_blank\">\n");
                    input(html, form, Field::Name, "Your Name", "text", true);
                    input(html, form, Field::Email, "Email Address", "email", true);
                    input(html, form, Field::Phone, "Phone Number", "tel", false);
                    textarea(html, form, Field::Message, "Your Message", true);
                    html.push_str(
                        "<a class=\"button secondary\" href=\"/\">Cancel</a>\n\
                         <button type=\"submit\">Send via WhatsApp</button>\n</form>\n</dialog>\n",
                    );
                }
            }
            Overlay::Booking {
                index,
                modal,
                error,
            } => {
                if let (Some(package), Some(form)) = (modal.package(), modal.form()) {
                    html.push_str(&format!(
                        "<dialog class=\"modal booking-modal\" open>\n<h2>Book: {}</h2>\n\
                         <p class=\"price\">${} &middot; {} Days</p>\n",
                        escape(&package.title),
                        escape(&package.price),
                        package.days
                    ));
                    error_alert(html, error.as_deref());
                    html.push_str(&format!(
                        "<form method=\"post\" action=\"/packages/{index}/book\">\n"
                    ));
                    input(html, form, Field::Name, "Full Name", "text", true);
                    input(html, form, Field::Email, "Email Address", "email", true);
                    input(html, form, Field::Phone, "Phone Number", "tel", true);
                    input(html, form, Field::Travelers, "Number of Travelers", "number", true);
                    textarea(html, form, Field::Message, "Special Requests", false);
                    html.push_str(
                        "<a class=\"button secondary\" href=\"/#packages\">Cancel</a>\n\
                         <button type=\"submit\">Submit Booking</button>\n</form>\n</dialog>\n",
                    );
                }
            }
            Overlay::Confirmation { message } => {
                html.push_str(&format!(
                    "<dialog class=\"modal confirmation\" open>\n<p>{}</p>\n\
                     <a class=\"button\" href=\"/\">Close</a>\n</dialog>\n",
                    escape(message)
                ));
            }
        }
    }
}

/// Opening tag of a carousel section. The page script re-renders the
/// section from `/carousels/{name}` every `interval`.
fn carousel_open(html: &mut String, name: &str, class: &str, interval: Duration, pause_on_hover: bool) {
    let hover = if pause_on_hover { " data-pause-on-hover" } else { "" };
    html.push_str(&format!(
        "<section id=\"{name}\" class=\"{class}\" data-carousel=\"{name}\" \
         data-interval=\"{}\"{hover}>\n",
        interval.as_millis()
    ));
}

fn carousel_controls(html: &mut String, name: &str, page: usize, page_count: usize) {
    html.push_str(&format!(
        "<div class=\"carousel-controls\">\n\
         <button type=\"button\" data-carousel=\"{name}\" data-action=\"prev\" aria-label=\"Previous\">&lsaquo;</button>\n"
    ));
    for i in 0..page_count {
        let active = if i == page { " active" } else { "" };
        html.push_str(&format!(
            "<button type=\"button\" class=\"indicator{active}\" data-carousel=\"{name}\" \
             data-action=\"jump\" data-page=\"{i}\" aria-label=\"Page {}\"></button>\n",
            i + 1
        ));
    }
    html.push_str(&format!(
        "<button type=\"button\" data-carousel=\"{name}\" data-action=\"next\" aria-label=\"Next\">&rsaquo;</button>\n</div>\n"
    ));
}

/// Top destinations rotator section
pub fn destinations_section(view: &CarouselView<TopDestination>, interval: Duration) -> String {
    let mut html = String::new();
    carousel_open(&mut html, "destinations", "top-destinations", interval, false);
    html.push_str("<h2>Top Destinations</h2>\n<div class=\"carousel-window\">\n");
    for destination in &view.items {
        html.push_str(&format!(
            "<article class=\"destination-card\">\n<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n\
             <h3>{}</h3>\n<p>{}</p>\n</article>\n",
            escape(&destination.image),
            escape(&destination.name),
            escape(&destination.name),
            escape(&destination.location)
        ));
    }
    html.push_str("</div>\n");
    carousel_controls(&mut html, "destinations", view.page, view.page_count);
    html.push_str("</section>\n");
    html
}

/// Reviews rotator section. Hovering it holds the displayed window.
pub fn reviews_section(view: &CarouselView<Review>, interval: Duration) -> String {
    let mut html = String::new();
    carousel_open(&mut html, "reviews", "reviews", interval, true);
    html.push_str("<h2>What Our Travelers Say</h2>\n<div class=\"carousel-window\">\n");
    for review in &view.items {
        let verified = if review.verified {
            "<span class=\"verified\">Verified</span>"
        } else {
            ""
        };
        html.push_str(&format!(
            "<article class=\"review-card\">\n<img class=\"tour-image\" src=\"{}\" alt=\"{}\" loading=\"lazy\">\n\
             <p class=\"rating\">{}</p>\n<blockquote>{}</blockquote>\n\
             <footer><img class=\"avatar\" src=\"{}\" alt=\"\"><strong>{}</strong> {verified}\
             <span>{}</span> <time>{}</time></footer>\n</article>\n",
            escape(&review.tour_image),
            escape(&review.tour_package),
            stars(review.rating),
            escape(&review.text),
            escape(&review.avatar),
            escape(&review.name),
            escape(&review.location),
            escape(&review.date)
        ));
    }
    html.push_str("</div>\n");
    carousel_controls(&mut html, "reviews", view.page, view.page_count);
    html.push_str("</section>\n");
    html
}

fn error_alert(html: &mut String, error: Option<&str>) {
    if let Some(error) = error {
        html.push_str(&format!("<p class=\"alert\" role=\"alert\">{}</p>\n", escape(error)));
    }
}

fn input(html: &mut String, form: &FormData, field: Field, label: &str, kind: &str, required: bool) {
    let required = if required { " required" } else { "" };
    html.push_str(&format!(
        "<label>{label}<input type=\"{kind}\" name=\"{field}\" value=\"{}\"{required}></label>\n",
        escape(form.get(field))
    ));
}

fn textarea(html: &mut String, form: &FormData, field: Field, label: &str, required: bool) {
    let required = if required { " required" } else { "" };
    html.push_str(&format!(
        "<label>{label}<textarea name=\"{field}\" rows=\"4\"{required}>{}</textarea></label>\n",
        escape(form.get(field))
    ));
}

const CAROUSEL_SCRIPT: &str = r#"<script>
async function refreshCarousel(name) {
  const section = document.querySelector(`section[data-carousel="${name}"]`);
  const response = await fetch(`/carousels/${name}`);
  if (section && response.ok) {
    section.outerHTML = await response.text();
  }
}
document.addEventListener("click", async (event) => {
  const button = event.target.closest("button[data-carousel]");
  if (!button) return;
  const { carousel, action, page } = button.dataset;
  const init = { method: "POST" };
  if (action === "jump") {
    init.headers = { "Content-Type": "application/json" };
    init.body = JSON.stringify({ page: Number(page) });
  }
  await fetch(`/api/carousels/${carousel}/${action}`, init);
  refreshCarousel(carousel);
});
document.querySelectorAll("section[data-carousel]").forEach((initial) => {
  const name = initial.dataset.carousel;
  setInterval(() => {
    const section = document.querySelector(`section[data-carousel="${name}"]`);
    if (section && section.hasAttribute("data-pause-on-hover") && section.matches(":hover")) return;
    refreshCarousel(name);
  }, Number(initial.dataset.interval));
});
</script>
"#;
