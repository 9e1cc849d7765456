use askama::Template;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::heat::{paint_heat_elements, HeatElement, Palette};
use crate::theme::{DisplayMode, ThemeColors};

/// A card as printed.  `heat` keeps the text shown on the card; it is only
/// read as a number when the sheet is colored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub heat: String,
    #[serde(default)]
    pub flavor_text: String,
}

impl Card {
    fn new(name: &str, heat: i64, flavor_text: &str) -> Self {
        Self {
            name: name.to_string(),
            heat: heat.to_string(),
            flavor_text: flavor_text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSheet {
    pub title: String,
    pub cards: Vec<Card>,
    pub palette: Palette,
    pub last_updated: String,
}

impl Default for CardSheet {
    fn default() -> Self {
        Self {
            title: "Hot Mech Card Printout".to_string(),
            cards: default_deck(),
            palette: Palette::default(),
            last_updated: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl CardSheet {
    pub fn touch(&mut self) {
        self.last_updated = chrono::Utc::now().to_rfc3339();
    }
}

fn default_deck() -> Vec<Card> {
    vec![
        Card::new("Standard Move", 1, "\"Step by step, gear by gear, we march through metal and fear.\"\n— Seawell Militia Drill Song"),
        Card::new("Standing Swivel", 1, "\"In the dance of death, always pirouette!\"\n— Ballera, Mecha Duelist"),
        Card::new("Step Up", 2, "\"When the words crumbles beneath you: step up, step up\"\n— Excerpt from Skaldic death poem"),
        Card::new("Combat Wit", 1, "\"Only thing sharper than vibroblades - is me!\"\n— Dillhung the Copper Thief"),
        Card::new("Step Back", -2, "\"The shadows are always there to welcome the wary.\"\n— V1ncent, Guerilla Droid"),
        Card::new("Cool Off", -4, "\"To forge the strongest iron, spare the constant hammering - let it rest.\"\n— Old Smokey"),
        Card::new("Cook Cabin", 3, "\"May our hope burn brighter than our cockpit fires!\"\n— Reckles, Emberkin"),
        Card::new("Shake It Off", -1, ""),
        Card::new("Slow It Down", -2, "\"The oldest titans tread the softest.\"\n— Grimsmear the Unyielding"),
        Card::new("Laser Snapfire", 2, "\"Nuthn' faster than searing light.\"\n— Pyre, Scabland Lantern King"),
        Card::new("Drive By", 3, "\"Passing by the gates of hell, we wave with guns blazing.\"\n— Nia, Sand Rambler"),
        Card::new("Mechanical Fuse", -3, "\"Mortality is law. For all life. For all machines.\"\n— Segg, Digital Deacon"),
        Card::new("Remember Training", 0, "\"Cacophony on the battlefield, symphony in my mind.\"\n— Allison the Deadhand"),
    ]
}

/// Read `name,heat,flavor_text` rows.
pub fn cards_from_csv(data: impl std::io::Read) -> Result<Vec<Card>> {
    let mut reader = csv::Reader::from_reader(data);
    let mut cards = Vec::new();
    for row in reader.deserialize() {
        cards.push(row?);
    }
    Ok(cards)
}

struct CardView {
    card: Card,
    background: String,
}

impl HeatElement for CardView {
    fn heat_text(&self) -> &str {
        &self.card.heat
    }

    fn set_background(&mut self, css: String) {
        self.background = css;
    }
}

/// The printable sheet page.
#[derive(Template)]
#[template(path = "sheet.html")]
pub struct SheetPage {
    title: String,
    mode: &'static str,
    body_class: &'static str,
    toggle_glyph: &'static str,
    toggle_mode: &'static str,
    colors: &'static ThemeColors,
    palette_css: String,
    cards: Vec<CardView>,
    last_updated: String,
}

/// Build the sheet page with every card's heat badge colored.
pub fn sheet_page(sheet: &CardSheet, mode: DisplayMode) -> SheetPage {
    let mut cards: Vec<CardView> = sheet
        .cards
        .iter()
        .map(|card| CardView { card: card.clone(), background: String::new() })
        .collect();
    tracing::info!("Coloring {} cards", cards.len());
    paint_heat_elements(&sheet.palette, cards.iter_mut());

    SheetPage {
        title: sheet.title.clone(),
        mode: mode.as_str(),
        body_class: mode.body_class(),
        toggle_glyph: mode.toggle_glyph(),
        toggle_mode: mode.toggle().as_str(),
        colors: mode.colors(),
        palette_css: sheet.palette.to_stylesheet(),
        cards,
        last_updated: sheet.last_updated.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn render_sheet(sheet: &CardSheet, mode: DisplayMode) -> String {
        sheet_page(sheet, mode).render().unwrap()
    }

    fn sheet(cards: Vec<Card>) -> CardSheet {
        CardSheet {
            title: "Test Sheet".to_string(),
            cards,
            palette: Palette::new(Color::new(0, 0, 255), Color::new(255, 0, 0)),
            last_updated: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn parses_card_csv() {
        let csv = "name,heat,flavor_text\nTorch Em,3,\"Burn, baby\"\nCool Off,-4,\n";
        let cards = cards_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "Torch Em");
        assert_eq!(cards[0].flavor_text, "Burn, baby");
        assert_eq!(cards[1].heat, "-4");
        assert_eq!(cards[1].flavor_text, "");
    }

    #[test]
    fn short_csv_row_is_an_error() {
        let csv = "name,heat,flavor_text\nTorch Em\n";
        let err = cards_from_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, crate::error::Error::Csv(_)));
    }

    #[test]
    fn renders_heat_backgrounds() {
        let html = render_sheet(
            &sheet(vec![
                Card::new("Blazing", 6, ""),
                Card::new("Warm", 3, ""),
                Card::new("Frozen", -9, ""),
                Card { name: "Broken".to_string(), heat: "??".to_string(), flavor_text: String::new() },
            ]),
            DisplayMode::Dark,
        );
        assert!(html.contains("background-color: rgb(255, 0, 0)"));
        assert!(html.contains("background-color: rgb(255, 128, 128)"));
        assert!(html.contains("background-color: rgb(0, 0, 255)"));
        assert!(html.contains("background-color: rgb(255, 255, 255)"));
        assert!(html.contains("--cool: #0000ff;"));
    }

    #[test]
    fn renders_toggle_for_mode() {
        let light = render_sheet(&sheet(vec![]), DisplayMode::Light);
        assert!(light.contains("class=\"light-mode\""));
        assert!(light.contains("href=\"/?mode=dark\""));
        assert!(light.contains("🌜"));

        let dark = render_sheet(&sheet(vec![]), DisplayMode::Dark);
        assert!(dark.contains("href=\"/?mode=light\""));
        assert!(dark.contains("🌞"));
    }

    #[test]
    fn escapes_card_text() {
        let html = render_sheet(
            &sheet(vec![Card::new("<script>", 1, "")]),
            DisplayMode::Dark,
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn default_deck_spans_the_scale() {
        let deck = CardSheet::default().cards;
        assert!(deck.iter().any(|c| c.heat.starts_with('-')));
        assert!(deck.iter().any(|c| c.heat == "0"));
        assert!(deck.iter().all(|c| crate::heat::parse_heat(&c.heat).is_ok()));
    }
}
