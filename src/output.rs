//! The output table and its sinks.

use crate::config::{Chapter, Settings};
use crate::errors::{self, Result};
use crate::merge::{FlaggedRow, Joined};
use crate::overrides::OverrideCard;
use itertools::Itertools;
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::{fmt, fs, io};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputRow {
    pub note_id: String,
    pub native: String,
    pub part_of_speech: String,
    pub definition: String,
    pub answer_lang: String,
    pub primary: String,
    pub secondary: String,
    pub pronunciation: String,
    pub audio: String,
    pub primary_color: String,
    pub chapter: Chapter,
    pub table_answer: String,
    pub table_prompt: String,
    pub has_table: String,
    pub no_table: String,
    pub override_pronunciation: String,
    pub notes: String,
    pub tags: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    NoteId,
    Native,
    PartOfSpeech,
    Definition,
    AnswerLang,
    Primary,
    Secondary,
    Pronunciation,
    Audio,
    PrimaryColor,
    Chapter,
    TableAnswer,
    TablePrompt,
    HasTable,
    NoTable,
    OverridePronunciation,
    Notes,
    Tags,
}

const BASE_COLUMNS: [Column; 11] = [
    Column::NoteId,
    Column::Native,
    Column::PartOfSpeech,
    Column::Definition,
    Column::AnswerLang,
    Column::Primary,
    Column::Secondary,
    Column::Pronunciation,
    Column::Audio,
    Column::PrimaryColor,
    Column::Chapter,
];

const OVERRIDE_COLUMNS: [Column; 6] = [
    Column::TableAnswer,
    Column::TablePrompt,
    Column::HasTable,
    Column::NoTable,
    Column::OverridePronunciation,
    Column::Notes,
];

pub enum Cell<'a> {
    Text(&'a str),
    Number(Chapter),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::NoteId => "note_id",
            Column::Native => "native",
            Column::PartOfSpeech => "part_of_speech",
            Column::Definition => "definition",
            Column::AnswerLang => "answer_lang",
            Column::Primary => "primary",
            Column::Secondary => "secondary",
            Column::Pronunciation => "pronunciation",
            Column::Audio => "audio",
            Column::PrimaryColor => "primary_color",
            Column::Chapter => "chapter",
            Column::TableAnswer => "table_answer",
            Column::TablePrompt => "table_prompt",
            Column::HasTable => "has_table",
            Column::NoTable => "no_table",
            Column::OverridePronunciation => "override_pronunciation",
            Column::Notes => "notes",
            Column::Tags => "tags",
        }
    }

    pub fn cell<'a>(&self, row: &'a OutputRow) -> Cell<'a> {
        let text = match self {
            Column::NoteId => &row.note_id,
            Column::Native => &row.native,
            Column::PartOfSpeech => &row.part_of_speech,
            Column::Definition => &row.definition,
            Column::AnswerLang => &row.answer_lang,
            Column::Primary => &row.primary,
            Column::Secondary => &row.secondary,
            Column::Pronunciation => &row.pronunciation,
            Column::Audio => &row.audio,
            Column::PrimaryColor => &row.primary_color,
            Column::Chapter => return Cell::Number(row.chapter),
            Column::TableAnswer => &row.table_answer,
            Column::TablePrompt => &row.table_prompt,
            Column::HasTable => &row.has_table,
            Column::NoTable => &row.no_table,
            Column::OverridePronunciation => &row.override_pronunciation,
            Column::Notes => &row.notes,
            Column::Tags => &row.tags,
        };
        Cell::Text(text)
    }
}

/// Rows with a fixed projection of named columns.
#[derive(Debug)]
pub struct Table {
    pub columns: Vec<(Column, String)>,
    pub rows: Vec<OutputRow>,
}

impl Table {
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|(_, name)| name.as_str()).collect()
    }

    pub fn cells<'a>(&'a self, row: &'a OutputRow) -> impl Iterator<Item = Cell<'a>> {
        self.columns.iter().map(move |(c, _)| c.cell(row))
    }
}

fn flagged_fields(f: &FlaggedRow, settings: &Settings) -> OutputRow {
    OutputRow {
        note_id: format!("{}{}", settings.id_prefix, f.card.headword),
        native: f.card.native.clone(),
        part_of_speech: f.card.part_of_speech.clone(),
        definition: f.card.definition.clone(),
        answer_lang: f.card.source.hint(settings),
        primary: f.card.primary.clone(),
        secondary: f.card.secondary.clone(),
        pronunciation: f.card.pronunciation.clone(),
        audio: f.annotation.audio.clone(),
        primary_color: f.annotation.markup.clone(),
        chapter: f.annotation.chapter,
        no_table: "Y".to_owned(),
        tags: f.annotation.tags.clone(),
        ..OutputRow::default()
    }
}

fn with_override(row: OutputRow, o: &OverrideCard) -> OutputRow {
    OutputRow {
        note_id: o.id.clone(),
        audio: o.audio.clone(),
        chapter: o.chapter,
        tags: o.tags.clone(),
        table_answer: o.table_answer.clone(),
        table_prompt: o.table_prompt.clone(),
        has_table: "has_table".to_owned(),
        no_table: String::new(),
        override_pronunciation: o.pronunciation.clone(),
        notes: o.notes.clone(),
        ..row
    }
}

fn to_row(joined: &Joined, settings: &Settings) -> OutputRow {
    match joined {
        Joined::FlaggedOnly(f) => flagged_fields(f, settings),
        Joined::Both(f, o) => with_override(flagged_fields(f, settings), o),
        Joined::OverrideOnly(o) => with_override(OutputRow::default(), o),
    }
}

/// Builds the output table.
///
/// The override columns are only present if an override table was supplied.
/// Column renames from the settings are applied to the header.
pub fn assemble(joined: &[Joined], settings: &Settings, with_overrides: bool) -> Table {
    let mut columns = BASE_COLUMNS.to_vec();
    if with_overrides {
        columns.extend(OVERRIDE_COLUMNS);
    }
    columns.push(Column::Tags);
    let columns = columns
        .into_iter()
        .map(|c| {
            let name = settings
                .column_names
                .get(c.name())
                .cloned()
                .unwrap_or_else(|| c.name().to_owned());
            (c, name)
        })
        .collect_vec();
    let rows = joined.iter().map(|j| to_row(j, settings)).collect_vec();
    Table { columns, rows }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Tab-separated, no quoting
    Tsv,
    Json,
    Xlsx,
}

fn check_tsv_cell(s: &str) -> Result<()> {
    if s.contains(['\t', '\n', '\r']) {
        return Err(errors::invalid_input(format!(
            "cannot write a tab or line break without quoting: {s:?}"
        )));
    }
    Ok(())
}

fn tsv_writer<W: io::Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer)
}

pub fn write_tsv<W: io::Write>(table: &Table, writer: W) -> Result<()> {
    let mut w = tsv_writer(writer);
    w.write_record(table.header())?;
    for row in &table.rows {
        let cells = table.cells(row).map(|c| c.to_string()).collect_vec();
        for c in &cells {
            check_tsv_cell(c)?;
        }
        w.write_record(&cells)?;
    }
    w.flush()?;
    Ok(())
}

/// Header line only, for setting up the note type.
pub fn write_fields<W: io::Write>(table: &Table, writer: W) -> Result<()> {
    let mut w = tsv_writer(writer);
    w.write_record(table.header())?;
    w.flush()?;
    Ok(())
}

pub fn write_json<W: io::Write>(table: &Table, writer: W, pretty: bool) -> Result<()> {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .map(|(c, name)| {
                    let value = match c.cell(row) {
                        Cell::Text(s) => serde_json::Value::from(s),
                        Cell::Number(n) => serde_json::Value::from(n),
                    };
                    (name.clone(), value)
                })
                .collect::<serde_json::Map<_, _>>()
        })
        .collect_vec();
    if pretty {
        serde_json::to_writer_pretty(writer, &rows)?;
    } else {
        serde_json::to_writer(writer, &rows)?;
    }
    Ok(())
}

pub fn write_xlsx(table: &Table, filename: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("cards")?;
    for (col, name) in table.header().into_iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    for (i, row) in table.rows.iter().enumerate() {
        let r = i as u32 + 1;
        for (col, cell) in table.cells(row).enumerate() {
            match cell {
                Cell::Text(s) => worksheet.write_string(r, col as u16, s)?,
                Cell::Number(n) => worksheet.write_number(r, col as u16, n)?,
            };
        }
    }
    workbook.save(filename)?;
    Ok(())
}

/// Writes the table to `filename`.
/// For TSV output the header line is also written to `fields_file`, if given.
pub fn write(table: &Table, format: Format, filename: &str, fields_file: Option<&str>) -> Result<()> {
    match format {
        Format::Tsv => {
            let file = fs::File::create(filename)?;
            write_tsv(table, io::BufWriter::new(file))?;
            if let Some(fields) = fields_file {
                let file = fs::File::create(fields)?;
                write_fields(table, io::BufWriter::new(file))?;
            }
        }
        Format::Json => {
            let file = fs::File::create(filename)?;
            let mut writer = io::BufWriter::new(file);
            write_json(table, &mut writer, true)?;
            writer.flush()?;
        }
        Format::Xlsx => write_xlsx(table, filename)?,
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotate::Annotation;
    use crate::synth::{AnswerSource, FlaggedCard};
    use std::collections::BTreeMap;

    fn flagged(headword: &str) -> FlaggedRow {
        FlaggedRow {
            card: FlaggedCard {
                headword: headword.to_owned(),
                native: "house".to_owned(),
                part_of_speech: "N".to_owned(),
                definition: "def".to_owned(),
                source: AnswerSource::Target,
                primary: headword.to_owned(),
                secondary: "die Häuser".to_owned(),
                pronunciation: "p".to_owned(),
            },
            annotation: Annotation {
                markup: format!("<b>{headword}</b>"),
                audio: "[sound:f.mp3]".to_owned(),
                chapter: 999,
                tags: "TL_ch999".to_owned(),
            },
        }
    }

    fn over(id: &str, headword: &str) -> OverrideCard {
        OverrideCard {
            id: id.to_owned(),
            headword: headword.to_owned(),
            table_answer: "ta".to_owned(),
            table_prompt: "tp".to_owned(),
            pronunciation: "op".to_owned(),
            notes: "n".to_owned(),
            audio: "[sound:o.mp3]".to_owned(),
            chapter: 2,
            tags: "TL_ch02".to_owned(),
        }
    }

    #[test]
    fn columns_without_overrides() {
        let t = assemble(&[Joined::FlaggedOnly(flagged("Haus"))], &Settings::default(), false);
        assert_eq!(
            t.header(),
            [
                "note_id",
                "native",
                "part_of_speech",
                "definition",
                "answer_lang",
                "primary",
                "secondary",
                "pronunciation",
                "audio",
                "primary_color",
                "chapter",
                "tags"
            ]
        );
        let row = &t.rows[0];
        assert_eq!(row.note_id, "HW_Haus");
        assert_eq!(row.answer_lang, "[T]");
        assert_eq!(row.no_table, "Y");
        assert_eq!(row.has_table, "");
    }

    #[test]
    fn override_wins() {
        let joined = [
            Joined::Both(flagged("Haus"), over("7", "Haus")),
            Joined::OverrideOnly(over("8", "Heim")),
        ];
        let t = assemble(&joined, &Settings::default(), true);
        assert_eq!(t.columns.len(), 18);
        let both = &t.rows[0];
        assert_eq!(both.note_id, "7");
        assert_eq!(both.audio, "[sound:o.mp3]");
        assert_eq!(both.chapter, 2);
        assert_eq!(both.tags, "TL_ch02");
        assert_eq!(both.native, "house");
        assert_eq!(both.primary_color, "<b>Haus</b>");
        assert_eq!(both.has_table, "has_table");
        assert_eq!(both.no_table, "");
        let only = &t.rows[1];
        assert_eq!(only.note_id, "8");
        assert_eq!(only.native, "");
        assert_eq!(only.has_table, "has_table");
        assert_eq!(only.table_prompt, "tp");
    }

    #[test]
    fn renamed_columns() {
        let settings = Settings {
            column_names: BTreeMap::from([("native".to_owned(), "en1".to_owned())]),
            ..Settings::default()
        };
        let t = assemble(&[], &settings, false);
        assert_eq!(t.header()[1], "en1");
    }

    #[test]
    fn tsv() {
        let t = assemble(&[Joined::FlaggedOnly(flagged("Haus"))], &Settings::default(), false);
        let mut buf = vec![];
        write_tsv(&t, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines = text.lines().collect_vec();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("note_id\tnative\t"));
        assert_eq!(
            lines[1],
            "HW_Haus\thouse\tN\tdef\t[T]\tHaus\tdie Häuser\tp\t[sound:f.mp3]\t<b>Haus</b>\t999\tTL_ch999"
        );
    }

    #[test]
    fn tsv_rejects_tabs() {
        let mut f = flagged("Haus");
        f.card.definition = "a\tb".to_owned();
        let t = assemble(&[Joined::FlaggedOnly(f)], &Settings::default(), false);
        assert!(write_tsv(&t, vec![]).is_err());
    }

    #[test]
    fn json() {
        let t = assemble(&[Joined::FlaggedOnly(flagged("Haus"))], &Settings::default(), false);
        let mut buf = vec![];
        write_json(&t, &mut buf, false).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v[0]["note_id"], "HW_Haus");
        assert_eq!(v[0]["chapter"], 999);
    }

    #[test]
    fn files() {
        let dir = tempfile::tempdir().unwrap();
        let t = assemble(&[Joined::FlaggedOnly(flagged("Haus"))], &Settings::default(), false);
        let out = dir.path().join("out.txt");
        let fields = dir.path().join("out_fields.txt");
        write(
            &t,
            Format::Tsv,
            out.to_str().unwrap(),
            Some(fields.to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 2);
        assert_eq!(fs::read_to_string(&fields).unwrap().lines().count(), 1);
        let xlsx = dir.path().join("out.xlsx");
        write(&t, Format::Xlsx, xlsx.to_str().unwrap(), None).unwrap();
        assert!(xlsx.exists());
    }
}
