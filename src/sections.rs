use serde::Deserialize;

use crate::{
    config::RenderConfig,
    document::{Style, TextAlign},
    font::Typeface,
    record::{Education, ResumeRecord, WorkExperience},
    text_layout::{Layout, TextFlow},
};

const NAME: Style = Style::bold(14.0);
const CONTACT: Style = Style::regular(10.0);
const HEADING: Style = Style::bold(14.0);
const ENTRY: Style = Style::regular(12.0);
const SUBHEADING: Style = Style::bold(12.0);
const DETAILS: Style = Style::regular(10.0);
const BODY: Style = Style::regular(12.0);

/// A block of the resume, rendered as a contiguous run of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    WorkExperience,
    Education,
    Skills,
    Languages,
}

impl SectionKind {
    pub const DEFAULT_ORDER: [Self; 5] = [
        Self::Header,
        Self::WorkExperience,
        Self::Education,
        Self::Skills,
        Self::Languages,
    ];

    pub fn render(self, flow: &mut TextFlow, record: &ResumeRecord, config: &RenderConfig) {
        match self {
            Self::Header => render_header(flow, record, config),
            Self::WorkExperience => render_work_experience(flow, &record.work_experience, config),
            Self::Education => render_education(flow, &record.education_list, config),
            Self::Skills => render_free_text(flow, &config.labels.skills, &record.skills, config),
            Self::Languages => {
                render_free_text(flow, &config.labels.languages, &record.languages, config)
            }
        }
    }
}

/// Flows the whole record through the configured sections.
pub fn layout_resume(record: &ResumeRecord, config: &RenderConfig, typeface: &Typeface) -> Layout {
    let mut flow = TextFlow::new(typeface, config);
    for section in &config.section_order {
        section.render(&mut flow, record, config);
    }
    flow.finish()
}

fn render_header(flow: &mut TextFlow, record: &ResumeRecord, config: &RenderConfig) {
    if !record.name.is_empty() {
        flow.emit_line(&record.name, NAME, TextAlign::Center);
    }
    for field in [&record.address, &record.email, &record.phone] {
        if !field.is_empty() {
            flow.emit_line(field, CONTACT, TextAlign::Left);
        }
    }
    flow.skip(config.section_gap);
}

fn render_work_experience(flow: &mut TextFlow, entries: &[WorkExperience], config: &RenderConfig) {
    let labels = &config.labels;
    flow.emit_line(&labels.work_experience, HEADING, TextAlign::Left);
    for entry in entries {
        let lines = [
            (&labels.job_title, &entry.job_title),
            (&labels.company, &entry.company_name),
            (&labels.period, &entry.work_period),
        ];
        for (label, value) in lines {
            flow.emit_line(&format!("{label}{value}"), ENTRY, TextAlign::Left);
        }
        flow.emit_line(&labels.experience_details, SUBHEADING, TextAlign::Left);
        flow.emit_wrapped(
            &entry.experience_details,
            DETAILS,
            TextAlign::Left,
            config.wrap_width(),
        );
    }
}

fn render_education(flow: &mut TextFlow, entries: &[Education], config: &RenderConfig) {
    let labels = &config.labels;
    flow.emit_line(&labels.education, HEADING, TextAlign::Left);
    for entry in entries {
        let lines = [
            (&labels.school_name, &entry.school_name),
            (&labels.degree, &entry.degree),
            (&labels.graduation_year, &entry.graduation_year),
        ];
        for (label, value) in lines {
            flow.emit_line(&format!("{label}{value}"), ENTRY, TextAlign::Left);
        }
        flow.skip(config.entry_gap);
    }
}

fn render_free_text(flow: &mut TextFlow, heading: &str, text: &str, config: &RenderConfig) {
    flow.emit_line(heading, HEADING, TextAlign::Left);
    flow.emit_wrapped(text, BODY, TextAlign::Left, config.wrap_width());
}
