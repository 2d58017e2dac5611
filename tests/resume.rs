use std::{fs, path::Path};

use resume_typeset::{
    config::{FontPaths, RenderConfig},
    error::{Diagnostic, Error},
    font::{Font, Typeface},
    record::{ResumeRecord, WorkExperience},
    render_resume, render_with_typeface,
    sections::layout_resume,
};

const DEJAVU_SANS: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/DejaVuSans.ttf"));
const DEJAVU_SANS_BOLD: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/DejaVuSans-Bold.ttf"));

fn dejavu_paths() -> FontPaths {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fonts");
    FontPaths {
        regular: dir.join("DejaVuSans.ttf"),
        bold: dir.join("DejaVuSans-Bold.ttf"),
    }
}

#[allow(clippy::format_collect)] // We don't care about small optimisations in tests.
fn sha256_as_hex(data: &[u8]) -> String {
    use ring::digest;

    let hash = digest::digest(&digest::SHA256, data);
    hash.as_ref()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}

fn hex(text: &str) -> String {
    text.bytes().map(|b| format!("{:02x}", b)).collect()
}

fn jane_doe() -> ResumeRecord {
    ResumeRecord {
        name: "Jane Doe".to_owned(),
        skills: "Go, SQL".to_owned(),
        languages: "English".to_owned(),
        ..ResumeRecord::default()
    }
    .with_work_experience(WorkExperience {
        job_title: "Engineer".to_owned(),
        company_name: "Acme".to_owned(),
        work_period: "2020-2022".to_owned(),
        experience_details: "Built things.".to_owned(),
    })
}

#[test]
fn test_jane_doe() {
    let record = jane_doe();
    let config = RenderConfig::default();

    let layout = layout_resume(&record, &config, &Typeface::Standard);
    let texts = layout
        .pages
        .iter()
        .flat_map(|page| page.texts())
        .collect::<Vec<_>>();

    let expected = [
        "Jane Doe",
        "Work Experience:",
        "Engineer",
        "Acme",
        "2020-2022",
        "Built things.",
        "Skills:",
        "Go, SQL",
        "Languages:",
        "English",
    ];
    let mut remaining = texts.iter();
    for needle in expected {
        assert!(
            remaining.any(|text| text.contains(needle)),
            "{needle:?} missing or out of order in {texts:?}",
        );
    }

    let rendered = render_resume(&record, &config).unwrap();
    assert_eq!(rendered.page_count, 1);
    assert_eq!(rendered.file_name, "Resume.pdf");
    assert!(rendered.diagnostics.is_empty());

    let pdf = String::from_utf8_lossy(&rendered.bytes);
    let mut offset = 0;
    for needle in expected {
        let position = pdf[offset..]
            .find(&hex(needle))
            .unwrap_or_else(|| panic!("{needle:?} missing or out of order in the PDF"));
        offset += position;
    }
}

#[test]
fn test_empty_record() {
    let config = RenderConfig::default();
    let rendered = render_resume(&ResumeRecord::default(), &config).unwrap();

    assert_eq!(rendered.page_count, 1);
    assert!(rendered.diagnostics.is_empty());

    let pdf = String::from_utf8_lossy(&rendered.bytes);
    assert_eq!(pdf.matches(" Tj\n").count(), 4);
    assert!(pdf.contains(&hex("Education:")));
}

#[test]
fn test_rendering_is_idempotent() {
    let record = jane_doe();
    let config = RenderConfig::default();

    let first = render_resume(&record, &config).unwrap();
    let second = render_resume(&record, &config).unwrap();
    assert_eq!(first.bytes, second.bytes);
    assert_eq!(sha256_as_hex(&first.bytes), sha256_as_hex(&second.bytes));
}

#[test]
fn test_long_text_paginates_and_caps() {
    let skills = "Distributed systems, databases, compilers. ".repeat(400);
    let record = ResumeRecord::default().with_skills(skills);

    let rendered = render_resume(&record, &RenderConfig::default()).unwrap();
    assert!(rendered.page_count > 1);
    assert!(rendered.diagnostics.is_empty());
    assert!(String::from_utf8_lossy(&rendered.bytes)
        .contains(&format!("/Count {}", rendered.page_count)));

    let config = RenderConfig {
        max_pages: 2,
        ..RenderConfig::default()
    };
    let rendered = render_resume(&record, &config).unwrap();
    assert_eq!(rendered.page_count, 2);
    assert!(matches!(
        rendered.diagnostics.as_slice(),
        [Diagnostic::RenderOverflow { max_pages: 2, dropped_lines }] if *dropped_lines > 0
    ));
}

#[test]
fn test_record_from_form_json() {
    let (record, diagnostics) = ResumeRecord::from_json_str(
        r#"{
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": 5550100,
            "address": "1 Main St",
            "skills": "Go, SQL",
            "Languages": "English",
            "workExperience": [],
            "educationList": [
                { "schoolName": "State University", "degree": "BSc", "graduationYear": "2019" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        diagnostics,
        [Diagnostic::InvalidInput {
            field: "phone".to_owned(),
            found: "a number",
        }]
    );
    assert_eq!(record.phone, "");

    let rendered = render_resume(&record, &RenderConfig::default()).unwrap();
    let pdf = String::from_utf8_lossy(&rendered.bytes);
    assert!(pdf.contains(&hex("School Name: State University")));
}

#[test]
fn test_unsupported_characters_are_reported() {
    let record = ResumeRecord::default().with_languages("Русский");
    let rendered = render_resume(&record, &RenderConfig::default()).unwrap();

    assert_eq!(rendered.diagnostics.len(), 6);
    assert!(rendered
        .diagnostics
        .contains(&Diagnostic::UnsupportedCharacter { character: 'Р' }));
    assert!(String::from_utf8_lossy(&rendered.bytes).contains(&hex("???????")));
}

#[test]
fn test_embedded_fonts() {
    let config = RenderConfig {
        fonts: Some(dejavu_paths()),
        ..RenderConfig::default()
    };
    let record = jane_doe()
        .with_languages("Русский, English")
        .with_skills("Go,\tSQL");

    let rendered = render_resume(&record, &config).unwrap();
    assert_eq!(rendered.page_count, 1);
    assert!(rendered.diagnostics.is_empty());

    let pdf = String::from_utf8_lossy(&rendered.bytes);
    assert!(pdf.contains("/Subtype /TrueType /BaseFont /DejaVuSans "));
    assert!(pdf.contains("/Subtype /TrueType /BaseFont /DejaVuSans-Bold "));
    assert_eq!(pdf.matches("/FontFile2").count(), 2);
    assert_eq!(pdf.matches("/ToUnicode").count(), 2);
    assert!(!pdf.contains("/WinAnsiEncoding"));

    // Every used character, Cyrillic included, is mapped back to Unicode.
    for c in ['Р', 'у', 'J', ':'] {
        let unicode = format!("<{:04x}>", c as u32);
        assert!(pdf.contains(&unicode), "{c:?} missing from the ToUnicode map");
    }
    assert!(!pdf.contains("<0009>"));

    let again = render_resume(&record, &config).unwrap();
    assert_eq!(sha256_as_hex(&rendered.bytes), sha256_as_hex(&again.bytes));
}

#[test]
fn test_embedded_fonts_limit_distinct_characters() {
    let typeface = Typeface::Embedded {
        regular: Font::new(DEJAVU_SANS).unwrap(),
        bold: Font::new(DEJAVU_SANS_BOLD).unwrap(),
    };
    let config = RenderConfig::default();

    let cyrillic = ('\u{410}'..='\u{44f}').collect::<String>();
    let record = ResumeRecord::default().with_languages(cyrillic);
    assert!(render_with_typeface(&record, &config, &typeface).is_ok());

    let many = ('\u{400}'..='\u{52f}').collect::<String>();
    let record = ResumeRecord::default().with_languages(many);
    let result = render_with_typeface(&record, &config, &typeface);
    assert!(matches!(result, Err(Error::CharMapFull(_))));
}

#[test]
fn test_missing_font_file() {
    let config = RenderConfig {
        fonts: Some(FontPaths {
            regular: "does/not/exist-Regular.ttf".into(),
            bold: "does/not/exist-Bold.ttf".into(),
        }),
        ..RenderConfig::default()
    };

    let result = render_resume(&jane_doe(), &config);
    assert!(matches!(result, Err(Error::Io { path, .. }) if path == Path::new("does/not/exist-Regular.ttf")));
}

#[test]
fn test_save() {
    let rendered = render_resume(&jane_doe(), &RenderConfig::default()).unwrap();

    fs::create_dir_all("output").unwrap();
    let path = rendered.save(Path::new("output")).unwrap();

    assert_eq!(path, Path::new("output/Resume.pdf"));
    assert_eq!(fs::read(&path).unwrap(), rendered.bytes);
}
