//! HTML rendering of the listing page.

use std::fmt::Write;

use petboard_types::{IndexedPet, Partition};

use crate::flash::Flash;

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full listing page.
pub fn render_listing(partition: &Partition, flashes: &[Flash], errors: &[String]) -> String {
    let mut html = String::new();
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Pet Adoption</title>\n</head>\n<body>\n<h1>Pet Adoption</h1>\n",
    );

    for flash in flashes {
        let _ = writeln!(
            html,
            "<div class=\"flash {}\">{}</div>",
            flash.category.as_str(),
            escape(&flash.message)
        );
    }
    if !errors.is_empty() {
        html.push_str("<ul class=\"errors\">\n");
        for error in errors {
            let _ = writeln!(html, "<li>{}</li>", escape(error));
        }
        html.push_str("</ul>\n");
    }

    html.push_str(
        "<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\" class=\"create\">\n\
         <input name=\"name\" placeholder=\"Name\">\n\
         <input name=\"breed\" placeholder=\"Breed\">\n\
         <input name=\"age\" placeholder=\"Age\">\n\
         <input type=\"file\" name=\"photo\" accept=\".png,.jpg,.jpeg,.gif\">\n\
         <button type=\"submit\">Add pet</button>\n</form>\n",
    );

    html.push_str("<h2>Available</h2>\n<ul class=\"available\">\n");
    if partition.available.is_empty() {
        html.push_str("<li class=\"empty\">No pets available right now.</li>\n");
    }
    for entry in &partition.available {
        render_available(&mut html, entry);
    }
    html.push_str("</ul>\n");

    html.push_str("<h2>Adopted</h2>\n<ul class=\"adopted\">\n");
    for entry in &partition.adopted {
        let _ = writeln!(html, "<li>{}</li>", card(entry));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

fn card(entry: &IndexedPet) -> String {
    let pet = &entry.pet;
    format!(
        "<img src=\"{}\" alt=\"{}\" width=\"200\"> <strong>{}</strong> {} ({})",
        escape(&pet.image_url),
        escape(&pet.name),
        escape(&pet.name),
        escape(&pet.breed),
        escape(&pet.age)
    )
}

fn hidden_ref(entry: &IndexedPet) -> String {
    format!(
        "<input type=\"hidden\" name=\"pet_id\" value=\"{}\">\
         <input type=\"hidden\" name=\"pet_index\" value=\"{}\">",
        entry.pet.id, entry.index
    )
}

fn render_available(html: &mut String, entry: &IndexedPet) {
    let pet = &entry.pet;
    let target = hidden_ref(entry);
    let _ = writeln!(html, "<li>{}", card(entry));
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/adopt\">{target}<button>Mark adopted</button></form>"
    );
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/delete\">{target}<button>Delete</button></form>"
    );
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/edit\">{target}\
         <input name=\"edit_name\" value=\"{}\">\
         <input name=\"edit_breed\" value=\"{}\">\
         <input name=\"edit_age\" value=\"{}\">\
         <button>Save</button></form>",
        escape(&pet.name),
        escape(&pet.breed),
        escape(&pet.age)
    );
    html.push_str("</li>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use petboard_types::{PetDraft, PetRecord};

    fn pets() -> Vec<PetRecord> {
        let mut adopted = PetDraft::new("Tom", "Tabby", "2").into_record("https://x/t.gif");
        adopted.adopted = true;
        vec![
            PetDraft::new("Rex", "Lab", "3").into_record("https://x/y.png"),
            adopted,
        ]
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>\"Rex\" & 'Max'</b>"), "&lt;b&gt;&quot;Rex&quot; &amp; &#x27;Max&#x27;&lt;/b&gt;");
    }

    #[test]
    fn renders_groups_with_indices() {
        let records = pets();
        let html = render_listing(&Partition::from_records(&records), &[], &[]);
        assert!(html.contains("<strong>Rex</strong>"));
        assert!(html.contains("<strong>Tom</strong>"));
        assert!(html.contains("name=\"pet_index\" value=\"0\""));
        assert!(html.contains(&format!("name=\"pet_id\" value=\"{}\"", records[0].id)));
        // Adopted pets get no action forms.
        assert!(!html.contains("name=\"pet_index\" value=\"1\""));
    }

    #[test]
    fn renders_flashes_and_errors() {
        let html = render_listing(
            &Partition::default(),
            &[Flash::success("Pet deleted.")],
            &["A photo file is required.".to_string()],
        );
        assert!(html.contains("<div class=\"flash success\">Pet deleted.</div>"));
        assert!(html.contains("<li>A photo file is required.</li>"));
        assert!(html.contains("No pets available right now."));
    }

    #[test]
    fn user_text_is_escaped() {
        let records = vec![PetDraft::new("<script>", "Lab", "3").into_record("https://x/y.png")];
        let html = render_listing(&Partition::from_records(&records), &[], &[]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
