use std::collections::HashSet;

use planogrid_engine::allocate::ROW_WIDTH;
use planogrid_engine::config::LayoutConfig;
use planogrid_engine::decode::{decode_catalog, decode_inventory};
use planogrid_engine::model::FeedInput;
use planogrid_engine::run;

const HEADER: &str = "Grupo (Fórmula),Codigo Comercial,Tipo Prenda,Edad,Género,TITULO,COLOR,TALLE,STOCK ECOMMERCE,STOCK LOCALES,Ranking Analytics,Rankign Locales,PRICE_CENTS,IMAGEN CARGADA,NEW IN,FOTO CAMPAÑA,FOTO MODELO,VIDEO";

struct Line {
    key: String,
    garment_type: String,
    title: String,
    color: String,
    stock: i64,
    price: i64,
    campaign: String,
    video: bool,
}

impl Line {
    fn new(key: &str, garment_type: &str, title: &str) -> Self {
        Self {
            key: key.into(),
            garment_type: garment_type.into(),
            title: title.into(),
            color: "AZUL".into(),
            stock: 5,
            price: 159_900,
            campaign: "#N/A".into(),
            video: false,
        }
    }

    fn stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    fn price(mut self, price: i64) -> Self {
        self.price = price;
        self
    }

    fn color(mut self, color: &str) -> Self {
        self.color = color.into();
        self
    }

    fn video(mut self) -> Self {
        self.video = true;
        self
    }

    fn campaign(mut self, name: &str) -> Self {
        self.campaign = name.into();
        self
    }

    fn render(&self) -> String {
        let code: String = self.key.chars().take(8).collect();
        format!(
            "%{}%,{code},{},KIDS,FEMENINO,{},{},8,{},0,10,20,{},SI,#N/A,{},#N/A,{}",
            self.key,
            self.garment_type,
            self.title,
            self.color,
            self.stock,
            self.price,
            self.campaign,
            if self.video { "SI" } else { "#N/A" },
        )
    }
}

fn build_input(lines: &[Line], cataloged: &[&str]) -> FeedInput {
    let mut csv = String::from(HEADER);
    for line in lines {
        csv.push('\n');
        csv.push_str(&line.render());
    }

    let mut xml = String::from("<rss><channel>");
    for key in cataloged {
        xml.push_str(&format!(
            "<item><id>shop-{key}</id><title>t</title><description>d</description>\
             <image_link>https://cdn.example.com/media/{key}XY_front.jpg</image_link></item>"
        ));
    }
    xml.push_str("</channel></rss>");

    FeedInput {
        catalog: decode_catalog(&xml),
        inventory: decode_inventory(&csv).unwrap().rows,
    }
}

/// A mixed feed: valid items across types and colors, a video, a stale
/// item, a basic line, and an excluded type.
fn mixed_lines() -> Vec<Line> {
    let mut lines = Vec::new();
    let colors = ["AZUL", "ROJO", "BLANCO", "VERDE", "NEGRO", "ROSA"];
    let types = ["REMERA", "JEAN", "VESTIDO", "CAMPERA"];
    for i in 0..20 {
        let key = format!("VAL{i:07}");
        lines.push(
            Line::new(&key, types[i % types.len()], &format!("Prenda {i}"))
                .color(colors[i % colors.len()])
                .stock(20 - i as i64),
        );
        // A second size row per article.
        lines.push(
            Line::new(&key, types[i % types.len()], &format!("Prenda {i}"))
                .color(colors[i % colors.len()])
                .stock(1),
        );
    }
    lines.push(Line::new("VID0000001", "REMERA", "Remera Video").video());
    lines.push(Line::new("NOS0000001", "REMERA", "Remera Agotada").stock(0).price(0));
    lines.push(Line::new("BAS0000001", "REMERA", "Remera Basico"));
    lines.push(Line::new("OJO0000001", "OJOTA", "Ojota Playa"));
    lines
}

fn mixed_keys() -> Vec<String> {
    let mut keys: Vec<String> = (0..20).map(|i| format!("VAL{i:07}")).collect();
    keys.extend(
        ["VID0000001", "NOS0000001", "BAS0000001", "OJO0000001"]
            .map(String::from),
    );
    keys
}

fn mixed_config() -> LayoutConfig {
    LayoutConfig::from_toml(
        r#"
name = "Mixed"

[[rows]]
age = "KIDS"
slots = ["REMERA", "JEAN", "VESTIDO", "CAMPERA"]

[exclusions]
garment_types = ["OJOTA"]
deprioritized = ["BASICO"]
"#,
    )
    .unwrap()
}

#[test]
fn coverage_no_variant_created_or_lost() {
    let lines = mixed_lines();
    let keys = mixed_keys();
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let input = build_input(&lines, &refs);

    let result = run(&mixed_config(), &input);
    assert_eq!(result.ordering.len(), keys.len());
    assert_eq!(result.summary.total, keys.len());

    let out_keys: HashSet<&str> = result.ordering.iter().map(|v| v.group_key.as_str()).collect();
    assert_eq!(out_keys.len(), keys.len(), "no duplicates");
}

#[test]
fn group_keys_traceable_to_input_rows() {
    let lines = mixed_lines();
    let keys = mixed_keys();
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let input = build_input(&lines, &refs);

    let input_keys: HashSet<String> =
        input.inventory.iter().map(|r| r.stripped_group_key()).collect();
    let result = run(&mixed_config(), &input);
    for variant in &result.ordering {
        assert!(
            input_keys.contains(&variant.group_key),
            "output key {} has no source row",
            variant.group_key
        );
    }
}

#[test]
fn ordering_is_deterministic() {
    let lines = mixed_lines();
    let keys = mixed_keys();
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();

    let a = run(&mixed_config(), &build_input(&lines, &refs));
    let b = run(&mixed_config(), &build_input(&lines, &refs));
    let order = |r: &planogrid_engine::ArrangeResult| {
        r.ordering.iter().map(|v| v.group_key.clone()).collect::<Vec<_>>()
    };
    assert_eq!(order(&a), order(&b));
}

#[test]
fn arranged_rows_satisfy_hard_constraints() {
    // Three hero items against twenty products: enough pressure to
    // exercise the visual rules without starving the final rows.
    let mut lines = mixed_lines();
    lines.push(Line::new("CAM0000001", "REMERA", "Remera Campa A").campaign("Verano 26"));
    lines.push(Line::new("CAM0000002", "JEAN", "Jean Campa B").campaign("Invierno 26"));
    let mut keys = mixed_keys();
    keys.push("CAM0000001".into());
    keys.push("CAM0000002".into());
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let input = build_input(&lines, &refs);

    let result = run(&mixed_config(), &input);
    let arranged = &result.ordering[..result.summary.eligible];

    for row in arranged.chunks(ROW_WIDTH) {
        for pair in row.windows(2) {
            assert!(
                !(pair[0].media.is_visual() && pair[1].media.is_visual()),
                "adjacent visual media inside a row"
            );
        }
        assert!(row.iter().filter(|v| v.media.is_visual()).count() <= 2);
        assert!(
            row.iter()
                .filter(|v| v.media == planogrid_engine::model::MediaKind::Video)
                .count()
                <= 1
        );
        let campaigns: HashSet<&str> =
            row.iter().filter_map(|v| v.media.campaign_name()).collect();
        assert!(campaigns.len() <= 1, "mixed campaigns inside a row");
    }
}

#[test]
fn invalid_variants_never_precede_valid_ones() {
    let lines = mixed_lines();
    let keys = mixed_keys();
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let input = build_input(&lines, &refs);

    let result = run(&mixed_config(), &input);
    let stale_pos = result
        .ordering
        .iter()
        .position(|v| v.group_key == "NOS0000001")
        .unwrap();
    let last_valid = result
        .ordering
        .iter()
        .rposition(|v| v.has_stock && v.has_price && v.garment_type != "OJOTA")
        .unwrap();
    assert!(stale_pos > last_valid);
}

#[test]
fn excluded_types_come_strictly_last() {
    let lines = mixed_lines();
    let keys = mixed_keys();
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let input = build_input(&lines, &refs);

    let result = run(&mixed_config(), &input);
    let n = result.ordering.len();
    assert_eq!(result.summary.excluded, 1);
    assert_eq!(result.ordering[n - 1].group_key, "OJO0000001");

    // Basic line sits after every eligible item but before invalid ones.
    let basic_pos = result
        .ordering
        .iter()
        .position(|v| v.group_key == "BAS0000001")
        .unwrap();
    assert_eq!(basic_pos, result.summary.eligible);
}

#[test]
fn aggregation_sums_stock_across_rows() {
    // Scenario: two rows under one key, stock 5 and 0.
    let lines = vec![
        Line::new("ABCDEFGHIJ", "REMERA", "Remera").stock(5),
        Line::new("ABCDEFGHIJ", "REMERA", "Remera").stock(0),
    ];
    let input = build_input(&lines, &["ABCDEFGHIJ"]);
    let result = run(&LayoutConfig::default(), &input);

    assert_eq!(result.ordering.len(), 1);
    let v = &result.ordering[0];
    assert_eq!(v.stock_ecommerce, 5);
    assert!(v.has_stock);
}

#[test]
fn unranked_sentinels_survive_to_variants() {
    let mut csv = String::from(HEADER);
    csv.push_str("\n%SEN0000001%,SEN00000,REMERA,KIDS,FEMENINO,Remera,AZUL,8,abc,xyz,not-a-number,?,weird,SI,#N/A,#N/A,#N/A,#N/A");
    let input = FeedInput {
        catalog: decode_catalog(
            "<rss><channel><item><id>1</id><title>t</title><description>d</description>\
             <image_link>https://cdn.example.com/SEN0000001XX_1.jpg</image_link></item></channel></rss>",
        ),
        inventory: decode_inventory(&csv).unwrap().rows,
    };
    let result = run(&LayoutConfig::default(), &input);
    let v = &result.ordering[0];
    assert_eq!(v.ranking_analytics, 9999);
    assert_eq!(v.ranking_store, 9999);
    assert_eq!(v.stock_ecommerce, 0);
    assert!(!v.has_stock);
    assert!(!v.has_price);
}

#[test]
fn result_serializes_to_json() {
    let lines = vec![Line::new("ABCDEFGHIJ", "REMERA", "Remera")];
    let input = build_input(&lines, &["ABCDEFGHIJ"]);
    let result = run(&LayoutConfig::default(), &input);
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("ABCDEFGHIJ"));
}
