//! Server-rendered marketing page.

use std::fmt::Write;

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub struct Plan {
    pub name: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub cta: &'static str,
    pub popular: bool,
}

pub struct Testimonial {
    pub name: &'static str,
    pub initials: &'static str,
    pub quote: &'static str,
    pub rating: u8,
}

pub const FEATURES: [Feature; 4] = [
    Feature {
        title: "Personalized Monograms",
        description: "Enter your names, initials, wedding date, and venue. Create a logo that tells your unique love story.",
    },
    Feature {
        title: "Designer Fonts & Palettes",
        description: "Choose from curated wedding typography and color swatches including pastels, neutrals, and bold accents.",
    },
    Feature {
        title: "Instant Preview",
        description: "See updates as you adjust style, layout, and ornaments. Generate several candidates and keep the best.",
    },
    Feature {
        title: "Export Ready",
        description: "Download in SVG and PNG formats. Transparent backgrounds included.",
    },
];

pub const PLANS: [Plan; 2] = [
    Plan {
        name: "Starter",
        price: "$0/mo",
        description: "Great for getting started",
        features: &[
            "8 logo generations per week",
            "PNG downloads",
            "Watermark preview",
            "Basic customization",
            "Email support",
        ],
        cta: "Get Started",
        popular: false,
    },
    Plan {
        name: "Paid",
        price: "$5/mo",
        description: "Most popular, generous monthly limit",
        features: &[
            "Up to 200 logo generations / month",
            "SVG & PNG downloads",
            "No watermark",
            "Full customization",
            "Commercial print license",
            "Priority support",
        ],
        cta: "Choose Paid",
        popular: true,
    },
];

pub const TESTIMONIALS: [Testimonial; 4] = [
    Testimonial {
        name: "Sarah & Michael",
        initials: "SM",
        quote: "EverAfter Logos made creating our wedding monogram so easy! We had our design ready in under 10 minutes, and it looked absolutely stunning on our invitations.",
        rating: 5,
    },
    Testimonial {
        name: "Emily & David",
        initials: "ED",
        quote: "The print quality was exceptional. Our printer was impressed with the file formats, and the logo looked perfect on everything from napkins to our welcome sign.",
        rating: 5,
    },
    Testimonial {
        name: "Jessica & Ryan",
        initials: "JR",
        quote: "We saved so much time and money compared to hiring a designer. The templates were beautiful, and customizing them was incredibly intuitive.",
        rating: 5,
    },
    Testimonial {
        name: "Amanda & Chris",
        initials: "AC",
        quote: "I loved being able to see changes as I typed. We tried dozens of variations until we found the perfect one. Highly recommend!",
        rating: 5,
    },
];

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn hero(html: &mut String) {
    html.push_str(
        r##"<section class="hero">
<span class="badge">Instant Wedding Logo Creation</span>
<h1>Design Your Wedding Monogram in Minutes</h1>
<p>Create a personalized wedding logo with instant customization, designer fonts, and high-resolution downloads. Perfect for invitations, signage, and all your special day details.</p>
<a class="button" href="#customization">Start Designing</a>
<div class="sample"><div class="monogram">A &amp; J</div><div class="date">JUNE 15, 2025</div></div>
</section>
"##,
    );
}

fn features(html: &mut String) {
    html.push_str("<section id=\"features\">\n<h2>Everything You Need for Your Perfect Logo</h2>\n");
    for feature in &FEATURES {
        let _ = writeln!(
            html,
            "<div class=\"card\"><h3>{}</h3><p>{}</p></div>",
            escape_html(feature.title),
            escape_html(feature.description)
        );
    }
    html.push_str("</section>\n");
}

fn pricing(html: &mut String) {
    html.push_str("<section id=\"pricing\">\n<h2>Simple, Transparent Pricing</h2>\n");
    for plan in &PLANS {
        let class = if plan.popular { "plan popular" } else { "plan" };
        let _ = write!(
            html,
            "<div class=\"{}\"><h3>{}</h3><p class=\"price\">{}</p><p>{}</p><ul>",
            class,
            escape_html(plan.name),
            escape_html(plan.price),
            escape_html(plan.description)
        );
        for item in plan.features {
            let _ = write!(html, "<li>{}</li>", escape_html(item));
        }
        let _ = writeln!(html, "</ul><a class=\"button\" href=\"#customization\">{}</a></div>", escape_html(plan.cta));
    }
    html.push_str("<p class=\"note\">Starter plan requires no credit card. Paid plan is $5/month, cancel anytime.</p>\n</section>\n");
}

fn testimonials(html: &mut String) {
    html.push_str("<section id=\"testimonials\">\n<h2>Loved by Couples Everywhere</h2>\n");
    for testimonial in &TESTIMONIALS {
        let _ = writeln!(
            html,
            "<figure class=\"card\"><div class=\"stars\">{}</div><blockquote>&quot;{}&quot;</blockquote><figcaption><span class=\"avatar\">{}</span>{}</figcaption></figure>",
            "★".repeat(testimonial.rating as usize),
            escape_html(testimonial.quote),
            escape_html(testimonial.initials),
            escape_html(testimonial.name)
        );
    }
    html.push_str("</section>\n");
}

fn final_cta(html: &mut String) {
    html.push_str(
        r##"<section class="cta">
<h2>Make Your Day Uniquely Yours</h2>
<p>Create a beautiful wedding logo that reflects your love story. Start designing in minutes.</p>
<a class="button" href="#customization">Create Your Logo</a>
<ul class="trust"><li>Secure Checkout</li><li>Instant Access</li><li>Instant Delivery</li></ul>
</section>
"##,
    );
}

pub fn render_landing_page() -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>EverAfter Logos</title>\n</head>\n<body>\n",
    );
    hero(&mut html);
    features(&mut html);
    pricing(&mut html);
    testimonials(&mut html);
    final_cta(&mut html);
    let _ = writeln!(
        html,
        "<footer>&copy; {} EverAfter Logos</footer>\n</body>\n</html>",
        chrono::Utc::now().format("%Y")
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("A & B <3 \"x\""), "A &amp; B &lt;3 &quot;x&quot;");
    }

    #[test]
    fn test_landing_page_sections() {
        let html = render_landing_page();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Design Your Wedding Monogram in Minutes"));
        assert_eq!(html.matches("<h3>").count(), FEATURES.len() + PLANS.len());
        assert!(html.contains("$0/mo") && html.contains("$5/mo"));
        assert!(html.contains("Sarah &amp; Michael"));
        assert!(!html.contains("Sarah & Michael"));
        assert!(html.contains("Make Your Day Uniquely Yours"));
    }
}
