use flawcards::annotate::{Catalog, CatalogAnnotator};
use flawcards::chapter::NumericChapters;
use flawcards::config::Settings;
use flawcards::driver;
use flawcards::headword::BracketHeadword;
use flawcards::input::Input;
use flawcards::output::{self, Format, OutputRow, Table};
use std::fs;
use std::path::PathBuf;

fn init() {
    let _ = pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

fn slurp(filename: &str) -> String {
    let dir = env!("CARGO_MANIFEST_DIR");
    let mut path = PathBuf::from(dir);
    path.push(filename);
    fs::read_to_string(path).unwrap()
}

fn load() -> (Input, Catalog) {
    let input: Input = serde_json::from_str(&slurp("sample-data/notes.json")).unwrap();
    let catalog: Catalog = serde_json::from_str(&slurp("sample-data/catalog.json")).unwrap();
    (input, catalog)
}

fn build(settings: &Settings, input: &Input, catalog: &Catalog) -> (Table, Vec<String>) {
    let resolver = BracketHeadword::new(&settings.flags, &settings.headword_strip);
    let chapters = NumericChapters::new(settings);
    let mut annotator = CatalogAnnotator::new(catalog, &resolver, settings);
    let table = driver::run(settings, input, &resolver, &chapters, &mut annotator).unwrap();
    let missing = annotator
        .coverage
        .missing(catalog)
        .into_iter()
        .map(str::to_owned)
        .collect();
    (table, missing)
}

fn row<'a>(table: &'a Table, note_id: &str) -> &'a OutputRow {
    table.rows.iter().find(|r| r.note_id == note_id).unwrap()
}

#[test]
fn test_basic() {
    init();
    let (input, catalog) = load();
    let (table, missing) = build(&Settings::default(), &input, &catalog);
    assert_eq!(table.columns.len(), 18);
    assert_eq!(table.header().last(), Some(&"tags"));
    let ids = table.rows.iter().map(|r| r.note_id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, ["101", "HW_Heim", "102"]);
    assert_eq!(missing, ["Kind"]);
}

#[test]
fn test_mastered_excluded() {
    init();
    let (input, catalog) = load();
    let (table, _) = build(&Settings::default(), &input, &catalog);
    assert!(table.rows.iter().all(|r| r.primary != "Gebäude"));
    assert!(table.rows.iter().all(|r| r.note_id != "HW_Gebäude"));
}

#[test]
fn test_first_writer_wins() {
    init();
    let (input, catalog) = load();
    let (table, _) = build(&Settings::default(), &input, &catalog);
    let bau = row(&table, "101");
    assert_eq!(bau.native, "building");
    assert_eq!(bau.secondary, "der, -ten");
    assert_eq!(bau.answer_lang, "[N]");
    assert_eq!(bau.definition, "");
}

#[test]
fn test_override_precedence() {
    init();
    let (input, catalog) = load();
    let (table, _) = build(&Settings::default(), &input, &catalog);

    let bau = row(&table, "101");
    assert_eq!(bau.chapter, 2);
    assert_eq!(bau.audio, "[sound:bau.mp3]");
    assert_eq!(bau.tags, "TL_src_3 TL_src_2 TL_ch02");
    assert_eq!(bau.has_table, "has_table");
    assert_eq!(bau.no_table, "");
    assert_eq!(bau.notes, "see also Gebäude");
    assert!(bau.table_prompt.starts_with(r#"<table class="pa"><tr><td>Bau (n) [N]: 2</td>"#));
    assert!(bau.table_answer.contains("building; construction"));
    assert!(bau.table_answer.contains("<td>[N] im Bau</td>"));

    let tur = row(&table, "102");
    assert_eq!(tur.native, "");
    assert_eq!(tur.chapter, 1);
    assert_eq!(tur.audio, "");
    assert_eq!(tur.tags, "TL_src_5 TL_ch01 TL_wordlist TL_no_audio");
    assert!(tur.table_prompt.contains(r#"<span class="TL-wl">Tür</span> (n) [T]: 1 [wooden]"#));
}

#[test]
fn test_flagged_only() {
    init();
    let (input, catalog) = load();
    let (table, _) = build(&Settings::default(), &input, &catalog);
    let heim = row(&table, "HW_Heim");
    assert_eq!(heim.native, "home");
    assert_eq!(heim.primary, "Heim");
    assert_eq!(heim.secondary, "das, -e");
    assert_eq!(heim.pronunciation, "haɪm");
    assert_eq!(heim.definition, "Zuhause (cosy)");
    assert_eq!(heim.answer_lang, "[T]");
    assert_eq!(heim.chapter, 4);
    assert_eq!(heim.audio, "[sound:heim.mp3]");
    assert_eq!(heim.primary_color, r#"<span class="TL-wl">Heim</span>"#);
    assert_eq!(heim.no_table, "Y");
    assert_eq!(heim.has_table, "");
    assert_eq!(heim.tags, "TL_ch04 TL_wordlist");
}

#[test]
fn test_settings_file() {
    init();
    let (input, catalog) = load();
    let settings: Settings = serde_json::from_str(&slurp("sample-data/settings.json")).unwrap();
    settings.validate().unwrap();
    let (table, _) = build(&settings, &input, &catalog);
    let header = table.header();
    assert_eq!(&header[..3], ["note_id", "english", "part_of_speech"]);
    assert!(header.contains(&"german"));
    let heim = row(&table, "de_Heim");
    assert_eq!(heim.answer_lang, "[DE]");
    let tur = row(&table, "102");
    assert!(tur.table_answer.contains(r#"open the <span class="hl">door</span>"#));
    assert!(tur.tags.starts_with("DE_src_5"));
}

#[test]
fn test_without_overrides() {
    init();
    let (mut input, catalog) = load();
    input.overrides = None;
    let (table, _) = build(&Settings::default(), &input, &catalog);
    assert_eq!(table.columns.len(), 12);
    let ids = table.rows.iter().map(|r| r.note_id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, ["HW_Bau", "HW_Heim"]);
    assert_eq!(row(&table, "HW_Bau").native, "building");
}

#[test]
fn test_write_tsv() {
    init();
    let (input, catalog) = load();
    let (table, _) = build(&Settings::default(), &input, &catalog);
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("cards.txt");
    let fields = dir.path().join("cards_fields.txt");
    output::write(
        &table,
        Format::Tsv,
        outfile.to_str().unwrap(),
        Some(fields.to_str().unwrap()),
    )
    .unwrap();
    let data = fs::read_to_string(&outfile).unwrap();
    let lines = data.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("note_id\tnative\t"));
    assert!(lines[2].starts_with("HW_Heim\thome\tn\tZuhause (cosy)\t[T]\t"));
    let header = fs::read_to_string(&fields).unwrap();
    assert_eq!(header.trim_end(), lines[0]);
}

#[test]
fn test_write_json() {
    init();
    let (input, catalog) = load();
    let (table, _) = build(&Settings::default(), &input, &catalog);
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("cards.json");
    output::write(&table, Format::Json, outfile.to_str().unwrap(), None).unwrap();
    let data = fs::read_to_string(&outfile).unwrap();
    let value: serde_json::Value = serde_json::from_str(&data).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1]["note_id"], "HW_Heim");
    assert_eq!(rows[1]["chapter"], 4);
}
