//! PubMed article XML parser.
//!
//! Turns one `efetch` XML document into a [`PaperRecord`]. Lookups:
//!
//! - identifier: first `MedlineCitation/PMID`, else `BookDocument/PMID`
//! - title: first `ArticleTitle`
//! - date: first `PubDate`, only if it has `Year`, `Month` and `Day`
//! - authors / affiliations: every `Author`, collected independently
//! - email: `Email` of the first `Author` with `ValidYN="Y"`

use crate::error::ParseFailure;
use crate::record::PaperRecord;
use crate::xml::{self, Element};
use tracing::{debug, warn};

/// Parse a PubMed XML document into a record.
///
/// Fails on input that is not well-formed XML or has no PMID; a failure
/// never yields a partially filled record.
pub fn parse_paper(xml: &str) -> Result<PaperRecord, ParseFailure> {
    let root = xml::parse_document(xml)?;

    let pubmed_id = ["MedlineCitation", "BookDocument"]
        .into_iter()
        .find_map(|container| root.find_all(container).find_map(|parent| parent.child("PMID")))
        .map(Element::text)
        .ok_or(ParseFailure::MissingIdentifier)?;

    let title = root.find("ArticleTitle").map(Element::text);
    let publication_date = root.find("PubDate").and_then(publication_date);

    let mut authors = Vec::new();
    let mut affiliations = Vec::new();
    for author in root.find_all("Author") {
        if let (Some(last), Some(fore)) = (author.child("LastName"), author.child("ForeName")) {
            authors.push(format!("{} {}", fore.text(), last.text()));
        }
        if let Some(affiliation) = author.find_path(&["AffiliationInfo", "Affiliation"]) {
            affiliations.push(affiliation.text());
        }
    }

    let corresponding_author_email = root
        .find_all("Author")
        .find(|author| author.attr("ValidYN") == Some("Y"))
        .and_then(|author| author.child("Email"))
        .map(Element::text);

    debug!(
        pmid = %pubmed_id,
        authors = authors.len(),
        affiliations = affiliations.len(),
        has_date = publication_date.is_some(),
        "Parsed paper"
    );

    Ok(PaperRecord {
        pubmed_id,
        title,
        publication_date,
        authors,
        affiliations,
        corresponding_author_email,
    })
}

/// Parse a document, logging and discarding failures.
pub fn try_parse_paper(xml: &str) -> Option<PaperRecord> {
    match parse_paper(xml) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "Error parsing XML");
            None
        }
    }
}

fn publication_date(pub_date: &Element) -> Option<String> {
    let year = pub_date.child("Year")?.text();
    let month = pub_date.child("Month")?.text();
    let day = pub_date.child("Day")?.text();
    Some(format!("{}-{}-{}", year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    const SAMPLE: &str = r#"
        <PubmedArticle>
            <MedlineCitation>
                <PMID>12345678</PMID>
                <Article>
                    <ArticleTitle>Example Paper Title</ArticleTitle>
                    <AuthorList>
                        <Author>
                            <LastName>Doe</LastName>
                            <ForeName>John</ForeName>
                            <AffiliationInfo>
                                <Affiliation>Pharma Company</Affiliation>
                            </AffiliationInfo>
                        </Author>
                        <Author>
                            <LastName>Smith</LastName>
                            <ForeName>Jane</ForeName>
                            <AffiliationInfo>
                                <Affiliation>University of Example</Affiliation>
                            </AffiliationInfo>
                        </Author>
                    </AuthorList>
                    <Journal>
                        <PubDate>
                            <Year>2023</Year>
                            <Month>Oct</Month>
                            <Day>15</Day>
                        </PubDate>
                    </Journal>
                </Article>
            </MedlineCitation>
        </PubmedArticle>
    "#;

    fn article(authors: &str, pub_date: &str) -> String {
        format!(
            "<PubmedArticle><MedlineCitation><PMID>1</PMID><Article>\
             <AuthorList>{}</AuthorList><Journal><PubDate>{}</PubDate></Journal>\
             </Article></MedlineCitation></PubmedArticle>",
            authors, pub_date
        )
    }

    #[test]
    fn test_parse_sample_article() {
        let record = parse_paper(SAMPLE).expect("sample parses");

        assert_eq!(
            record,
            PaperRecord {
                pubmed_id: "12345678".to_string(),
                title: Some("Example Paper Title".to_string()),
                publication_date: Some("2023-Oct-15".to_string()),
                authors: vec!["John Doe".to_string(), "Jane Smith".to_string()],
                affiliations: vec![
                    "Pharma Company".to_string(),
                    "University of Example".to_string()
                ],
                corresponding_author_email: None,
            }
        );
        assert!(record.has_non_academic_affiliation());
    }

    #[test]
    fn test_partial_dates_are_discarded() {
        for date in [
            "<Year>2023</Year><Month>Oct</Month>",
            "<Year>2023</Year><Day>15</Day>",
            "<Month>Oct</Month><Day>15</Day>",
            "<MedlineDate>2023 Oct-Nov</MedlineDate>",
        ] {
            let record = parse_paper(&article("", date)).expect("parses");
            assert_eq!(record.publication_date, None, "date: {}", date);
        }
    }

    #[test]
    fn test_authors_missing_a_name_part_are_skipped() {
        let authors = "<Author><LastName>Doe</LastName></Author>\
                       <Author><ForeName>Jane</ForeName></Author>\
                       <Author><CollectiveName>Study Group</CollectiveName></Author>\
                       <Author><LastName>Roe</LastName><ForeName>Richard</ForeName></Author>";
        let record = parse_paper(&article(authors, "")).expect("parses");
        assert_eq!(record.authors, vec!["Richard Roe".to_string()]);
    }

    #[test]
    fn test_affiliations_are_collected_independently_of_names() {
        let authors = "<Author><CollectiveName>Consortium</CollectiveName>\
                       <AffiliationInfo><Affiliation>Acme Corp</Affiliation></AffiliationInfo></Author>\
                       <Author><LastName>Roe</LastName><ForeName>Richard</ForeName></Author>";
        let record = parse_paper(&article(authors, "")).expect("parses");
        assert_eq!(record.authors, vec!["Richard Roe".to_string()]);
        assert_eq!(record.affiliations, vec!["Acme Corp".to_string()]);
    }

    #[test]
    fn test_only_first_affiliation_per_author() {
        let authors = "<Author><LastName>Roe</LastName><ForeName>Richard</ForeName>\
                       <AffiliationInfo><Affiliation>Acme Corp</Affiliation></AffiliationInfo>\
                       <AffiliationInfo><Affiliation>University of Example</Affiliation></AffiliationInfo>\
                       </Author>";
        let record = parse_paper(&article(authors, "")).expect("parses");
        assert_eq!(record.affiliations, vec!["Acme Corp".to_string()]);
    }

    #[test]
    fn test_corresponding_author_email() {
        let authors = r#"<Author ValidYN="N"><LastName>A</LastName><ForeName>B</ForeName><Email>no@example.com</Email></Author>
                         <Author ValidYN="Y"><LastName>C</LastName><ForeName>D</ForeName><Email>d.c@example.com</Email></Author>"#;
        let record = parse_paper(&article(authors, "")).expect("parses");
        assert_eq!(
            record.corresponding_author_email.as_deref(),
            Some("d.c@example.com")
        );
    }

    #[test]
    fn test_validated_author_without_email_gives_none() {
        let authors = r#"<Author ValidYN="Y"><LastName>C</LastName><ForeName>D</ForeName></Author>
                         <Author ValidYN="Y"><LastName>E</LastName><ForeName>F</ForeName><Email>f@example.com</Email></Author>"#;
        let record = parse_paper(&article(authors, "")).expect("parses");
        assert_eq!(record.corresponding_author_email, None);
    }

    #[test]
    fn test_empty_title_is_present_but_empty() {
        let xml = "<MedlineCitation><PMID>7</PMID><Article><ArticleTitle/></Article></MedlineCitation>";
        let record = parse_paper(xml).expect("parses");
        assert_eq!(record.pubmed_id, "7");
        assert_eq!(record.title.as_deref(), Some(""));
    }

    #[test]
    fn test_article_set_wrapper_and_inline_markup() {
        let xml = r#"<?xml version="1.0" ?>
            <!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
            <PubmedArticleSet><PubmedArticle><MedlineCitation Status="MEDLINE">
              <PMID Version="1">99</PMID>
              <Article><ArticleTitle>Role of <i>TP53</i> in tumours &amp; cell lines.</ArticleTitle></Article>
            </MedlineCitation></PubmedArticle></PubmedArticleSet>"#;
        let record = parse_paper(xml).expect("parses");
        assert_eq!(record.pubmed_id, "99");
        assert_eq!(
            record.title.as_deref(),
            Some("Role of TP53 in tumours & cell lines.")
        );
    }

    #[test]
    fn test_pmid_outside_medline_citation_is_ignored() {
        let xml = "<PubmedArticle><PubmedData><ArticleIdList><PMID>5</PMID></ArticleIdList></PubmedData></PubmedArticle>";
        assert!(matches!(
            parse_paper(xml),
            Err(ParseFailure::MissingIdentifier)
        ));
    }

    #[test]
    fn test_malformed_xml_yields_no_record() {
        let truncated = &SAMPLE[..SAMPLE.len() / 2];
        assert!(parse_paper(truncated).is_err());
        assert!(try_parse_paper(truncated).is_none());
        assert!(try_parse_paper("<PubmedArticle><PMID>1</PubmedArticle>").is_none());
    }

    #[test]
    fn test_malformed_xml_logs_diagnostic() {
        #[derive(Clone, Default)]
        struct SharedBuf(Arc<Mutex<Vec<u8>>>);

        impl Write for SharedBuf {
            fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
                self.0
                    .lock()
                    .map_err(|_| std::io::Error::other("poisoned"))?
                    .extend_from_slice(bytes);
                Ok(bytes.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let record = tracing::subscriber::with_default(subscriber, || {
            try_parse_paper(&SAMPLE[..SAMPLE.len() / 2])
        });
        assert!(record.is_none());

        let logged = buf.0.lock().expect("log buffer").clone();
        let logged = String::from_utf8(logged).expect("utf8 log");
        assert!(logged.contains("Error parsing XML"), "log: {}", logged);
    }

    #[test]
    fn test_book_article_uses_book_document_pmid() {
        let xml = "<PubmedArticleSet><PubmedBookArticle><BookDocument>\
                   <PMID Version=\"1\">555</PMID><ArticleTitle>Chapter 3</ArticleTitle>\
                   <AuthorList><Author><LastName>Roe</LastName><ForeName>Richard</ForeName>\
                   <AffiliationInfo><Affiliation>Acme Pharma</Affiliation></AffiliationInfo>\
                   </Author></AuthorList></BookDocument></PubmedBookArticle></PubmedArticleSet>";

        let record = try_parse_paper(xml).expect("book article parses");
        assert_eq!(record.pubmed_id, "555");
        assert_eq!(record.title.as_deref(), Some("Chapter 3"));
        assert_eq!(record.affiliations, vec!["Acme Pharma".to_string()]);
        assert!(record.has_non_academic_affiliation());
    }

    #[test]
    fn test_medline_pmid_wins_over_book_pmid() {
        let xml = "<Set><BookDocument><PMID>2</PMID></BookDocument>\
                   <MedlineCitation><PMID>1</PMID></MedlineCitation></Set>";
        assert_eq!(parse_paper(xml).expect("parses").pubmed_id, "1");
    }
}
