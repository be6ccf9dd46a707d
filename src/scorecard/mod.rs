//! Scorecard layout.
//!
//! Produces a printable description of numbered per-competitor scorecards,
//! four to a page in a two-column grid with cut lines.
//!
//! # Numbering
//! Within a round the counter starts at the roster size (or the number of
//! cards, if a competitor holds more than one group of the round) and
//! counts down as group number goes up. The highest number is the first
//! card of the lowest group; the last card is numbered at least 1 and no
//! two cards of a round share a number.
//!
//! # Pagination
//! Each group is padded with blank cards to a multiple of four, so a group
//! never shares a page with the next one.

pub mod layout;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::activity_code::{event_name_by_id, ActivityCode};
use crate::error::Result;
use crate::extension::{get_extension, CompetitionConfig};
use crate::formatters::{cutoff_to_string, pdf_name, time_limit_to_string};
use crate::models::{AssignmentCode, Competition, Person, Round};
use crate::navigation::round_group_activities;
use crate::roster::{has_assignment, Roster};

pub use layout::{
    Alignment, AlternatingPadding, Content, GridContent, GridLayout, GridTable, Line, Node,
    PageDocument, PageGeometry, Point, Scorecard, Shape, Style, Width,
};

/// Scorecards fitting on one page.
pub const SCORECARDS_PER_PAGE: usize = 4;

/// Fetches the optional scorecard background image.
#[async_trait]
pub trait ImageFetcher {
    /// Image at `url` as a data URL.
    async fn fetch_image(&self, url: &str) -> Result<String>;
}

/// Turns a layout description into a downloadable file.
#[async_trait]
pub trait DocumentRenderer {
    async fn render(&self, document: &PageDocument, file_name: &str) -> Result<()>;
}

/// Scorecards of all `rounds`, in the given round order.
///
/// # Errors
/// Malformed activity codes, malformed `CompetitionConfig` metadata, or a
/// roster failure.
pub fn scorecards<R>(
    competition: &Competition,
    rounds: &[Round],
    roster: &R,
    geometry: &PageGeometry,
) -> Result<Vec<Scorecard>>
where
    R: Roster + ?Sized,
{
    let local_names_first = get_extension::<CompetitionConfig, _>(competition)?
        .map(|c| c.local_names_first)
        .unwrap_or(false);

    let mut cards = Vec::new();
    for round in rounds {
        let mut groups = round_group_activities(competition, &round.id)?;
        groups.sort_by_key(|(code, _)| code.group_number);
        let competitors = roster.competitors_for_round(competition, &round.id)?;
        let round_cards: Vec<Vec<&Person>> = groups
            .iter()
            .map(|(_, group)| {
                competitors
                    .iter()
                    .copied()
                    .filter(|c| has_assignment(c, group.id, &AssignmentCode::Competitor))
                    .collect()
            })
            .collect();
        // A person competing in two groups of the round gets two cards.
        let card_count: usize = round_cards.iter().map(Vec::len).sum();
        let mut number = competitors.len().max(card_count) as u32;
        let round_start = cards.len();

        for ((code, _), group_competitors) in groups.iter().zip(&round_cards) {
            let group_start = cards.len();
            for &competitor in group_competitors {
                cards.push(Scorecard::Competitor {
                    number,
                    round_id: round.id.clone(),
                    group_number: code.group_number.unwrap_or_default(),
                    registrant_id: competitor.registrant_id,
                    body: scorecard_body(&ScorecardInput {
                        number,
                        competition_name: &competition.short_name,
                        code,
                        round,
                        competitor,
                        local_names_first,
                        geometry,
                    })?,
                });
                number -= 1;
            }

            let on_last_page = (cards.len() - group_start) % SCORECARDS_PER_PAGE;
            if on_last_page != 0 {
                cards.extend(
                    std::iter::repeat(Scorecard::Blank).take(SCORECARDS_PER_PAGE - on_last_page),
                );
            }
        }

        debug!(
            round_id = %round.id,
            groups = groups.len(),
            competitors = competitors.len(),
            cards = cards.len() - round_start,
            "laid out round scorecards"
        );
    }
    Ok(cards)
}

struct ScorecardInput<'a> {
    number: u32,
    competition_name: &'a str,
    code: &'a ActivityCode,
    round: &'a Round,
    competitor: &'a Person,
    local_names_first: bool,
    geometry: &'a PageGeometry,
}

fn scorecard_body(input: &ScorecardInput<'_>) -> Result<Vec<Node>> {
    let ScorecardInput {
        number,
        competition_name,
        code,
        round,
        competitor,
        local_names_first,
        geometry,
    } = *input;
    let optional = |n: Option<u32>| n.map(|n| n.to_string()).unwrap_or_default();

    let mut results = vec![column_labels(&["", "Scr", "Result", "Judge", "Comp"], true)];
    results.extend(attempt_rows(round, geometry));
    results.push(vec![Node::text("Extra attempt")
        .no_border()
        .col_span(5)
        .margin([0.0, 1.0, 0.0, 1.0])
        .font_size(10.0)]);
    results.push(attempt_row("_"));
    results.push(vec![Node::text("")
        .no_border()
        .col_span(5)
        .margin([0.0, 1.0, 0.0, 1.0])]);

    let cutoff = match &round.cutoff {
        Some(cutoff) => Node::text(format!("Cutoff: {}", cutoff_to_string(cutoff, &code.event_id)))
            .align(Alignment::Center),
        None => Node::empty(),
    };
    let time_limit = match &round.time_limit {
        Some(limit) => Node::text(format!("Time limit: {}", time_limit_to_string(limit)?))
            .align(Alignment::Center),
        None => Node::empty(),
    };

    Ok(vec![
        Node::text(number.to_string()).font_size(10.0),
        Node::text(competition_name)
            .bold()
            .font_size(15.0)
            .margin([0.0, 0.0, 0.0, 10.0])
            .align(Alignment::Center),
        Node::table(
            vec![Width::Star, Width::Auto, Width::Auto],
            vec![
                column_labels(&["Event", "Round", "Group"], false),
                vec![
                    Node::text(event_name_by_id(&code.event_id)),
                    Node::text(optional(code.round_number)).align(Alignment::Center),
                    Node::text(optional(code.group_number)).align(Alignment::Center),
                ],
            ],
        )
        .margin([25.0, 0.0, 0.0, 0.0]),
        Node::table(
            vec![Width::Auto, Width::Star],
            vec![
                column_labels(&["ID", "Name"], false),
                vec![
                    Node::text(optional(competitor.registrant_id)).align(Alignment::Center),
                    // Long names must not push the results table down.
                    Node::text(pdf_name(&competitor.name, local_names_first)).max_height(20.0),
                ],
            ],
        )
        .margin([25.0, 0.0, 0.0, 0.0]),
        // 16 + 2 × 4 padding + 1 border = 25, same as the other narrow columns.
        Node::table(
            vec![
                Width::Fixed(16.0),
                Width::Fixed(25.0),
                Width::Star,
                Width::Fixed(25.0),
                Width::Fixed(25.0),
            ],
            results,
        )
        .margin([0.0, 10.0, 0.0, 0.0]),
        Node::columns(vec![cutoff, time_limit]).font_size(10.0),
    ])
}

fn column_labels(labels: &[&str], centered: bool) -> Vec<Node> {
    labels
        .iter()
        .map(|label| {
            let node = Node::text(*label).no_border().font_size(9.0);
            if centered {
                node.align(Alignment::Center)
            } else {
                node
            }
        })
        .collect()
}

/// Attempt rows with separators between them; the separator after the
/// cutoff attempt carries a dashed line.
fn attempt_rows(round: &Round, geometry: &PageGeometry) -> Vec<Vec<Node>> {
    let attempt_count = round.format.max_attempts();
    let cutoff_attempts = round.cutoff.as_ref().map(|c| c.number_of_attempts);

    let mut rows = Vec::new();
    for attempt in 1..=attempt_count {
        rows.push(attempt_row(&attempt.to_string()));
        if attempt < attempt_count {
            rows.push(attempts_separator(cutoff_attempts == Some(attempt), geometry));
        }
    }
    rows
}

fn attempts_separator(cutoff_line: bool, geometry: &PageGeometry) -> Vec<Node> {
    let columns = if cutoff_line {
        vec![Node::canvas(vec![Shape::Line(
            Line::new(0.0, 0.0, geometry.card_width(), 0.0).dashed(5.0),
        )])]
    } else {
        Vec::new()
    };
    vec![Node::columns(columns)
        .no_border()
        .col_span(5)
        .margin([0.0, 1.0, 0.0, 1.0])]
}

fn attempt_row(label: &str) -> Vec<Node> {
    let mut row = vec![Node::text(label)
        .no_border()
        .font_size(20.0)
        .bold()
        .align(Alignment::Center)];
    row.extend(std::iter::repeat_with(Node::empty).take(4));
    row
}

fn cut_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
    Shape::Line(
        Line::new(x1, y1, x2, y2)
            .width(0.1)
            .dashed(10.0)
            .color("#888888"),
    )
}

/// Full document: background, cut lines and the two-column grid.
///
/// `background_image` is a data URL placed behind each card's results
/// table; `None` draws cut lines only.
pub fn scorecards_pdf_definition<R>(
    competition: &Competition,
    rounds: &[Round],
    roster: &R,
    background_image: Option<&str>,
    geometry: &PageGeometry,
) -> Result<PageDocument>
where
    R: Roster + ?Sized,
{
    let PageGeometry {
        page_width,
        page_height,
        margin,
        ..
    } = *geometry;

    let mut background: Vec<Node> = match background_image {
        Some(image) => geometry
            .background_anchors
            .iter()
            .map(|anchor| Node::image(image).at(*anchor))
            .collect(),
        None => Vec::new(),
    };
    background.push(Node::canvas(vec![
        cut_line(margin, page_height / 2.0, page_width - margin, page_height / 2.0),
        cut_line(page_width / 2.0, margin, page_width / 2.0, page_height - margin),
    ]));

    let cards = scorecards(competition, rounds, roster, geometry)?;
    let body: Vec<Vec<Scorecard>> = cards.chunks(2).map(|row| row.to_vec()).collect();

    // Outer margins come from the page; padding makes the inner gaps.
    let leading = AlternatingPadding {
        even: 0.0,
        odd: margin,
    };
    let trailing = AlternatingPadding {
        even: margin,
        odd: 0.0,
    };

    Ok(PageDocument {
        background,
        page_margins: [margin, margin],
        content: GridContent {
            layout: GridLayout {
                padding_left: leading,
                padding_right: trailing,
                padding_top: leading,
                padding_bottom: trailing,
                h_line_width: 0.0,
                v_line_width: 0.0,
            },
            table: GridTable {
                widths: vec![Width::Star, Width::Star],
                heights: geometry.card_height(),
                dont_break_rows: true,
                body,
            },
        },
    })
}

/// File name the rendered scorecards are saved under.
pub fn scorecards_file_name(competition: &Competition) -> String {
    format!("{}-scorecards.pdf", competition.id)
}

/// Builds the scorecards document and hands it to `renderer`.
///
/// The background image is fetched first when the competition configures
/// one. Failures of either collaborator are returned as is; nothing is
/// retried.
pub async fn download_scorecards<R, I, D>(
    competition: &Competition,
    rounds: &[Round],
    roster: &R,
    fetcher: &I,
    renderer: &D,
    geometry: &PageGeometry,
) -> Result<String>
where
    R: Roster + ?Sized,
    I: ImageFetcher + ?Sized,
    D: DocumentRenderer + ?Sized,
{
    let background_url = get_extension::<CompetitionConfig, _>(competition)?
        .and_then(|c| c.scorecards_background_url);
    let image = match background_url {
        Some(url) => Some(fetcher.fetch_image(&url).await?),
        None => None,
    };

    let document =
        scorecards_pdf_definition(competition, rounds, roster, image.as_deref(), geometry)?;
    let file_name = scorecards_file_name(competition);
    renderer.render(&document, &file_name).await?;
    info!(competition_id = %competition.id, file_name = %file_name, "rendered scorecards");
    Ok(file_name)
}
