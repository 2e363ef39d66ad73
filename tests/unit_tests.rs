//! Library-level tests across the matcher and annotator.
//!
//! These cover the end-to-end scenarios and cross-module properties:
//! occurrence counting, palindrome handling, context bounds and
//! strand-aware annotation.

use markmatch::annotator::{
    annotate_match, annotate_matches, load_cpg, load_genes, load_repeats, load_tss,
    overlapping_gene, FeatureIndex,
};
use markmatch::config::Config;
use markmatch::matcher::{
    extract_context, find_occurrences, match_marker, match_markers, reverse_complement,
};
use markmatch::output::{format_annotated_line, format_match_line};
use markmatch::types::{Marker, Match, MatchStrand, Reference, Strand};

// -------------------------------------------------------------------------
// Helper functions
// -------------------------------------------------------------------------

fn scenario_reference() -> Reference {
    Reference::new("chr1", "ACGTACGTTTACGT")
}

fn config_with_threads(threads: usize) -> Config {
    let mut config = Config::default();
    config.threads = threads;
    config
}

fn rows(text: &str) -> Vec<Vec<&str>> {
    text.lines().map(|l| l.split('\t').collect()).collect()
}

fn scenario_features(config: &Config) -> FeatureIndex {
    FeatureIndex {
        genes: load_genes(
            rows(
                "chr1\tens\tgene\t95\t120\t.\t+\t.\tID=gene:GPLUS;Name=PLUS1;biotype=protein_coding\n\
                 chr1\tens\tgene\t0\t500\t.\t-\t.\tID=gene:GMINUS;Name=MINUS1;biotype=lncRNA",
            ),
            config,
        ),
        tss: load_tss(
            rows(
                "gene\ttranscript\tchrom\ttss\tstrand\ttype\tsynonyms\n\
                 GPLUS\tTPLUS\tchr1\t95\t1\tprotein_coding\tPLUS1\n\
                 GMINUS\tTMINUS\tchr1\t500\t-1\tlncRNA\t",
            ),
            config,
        ),
        cpg: load_cpg(rows(
            "1\tchr1\t200\t400\tCpG: 20\t200\t20\t130\t20.0\t65.0\t0.8",
        )),
        repeats: load_repeats(rows("chr1\t90\t104\tAluSx\tSINE\t+")),
    }
}

fn make_match(start: u64, end: u64, strand: MatchStrand) -> Match {
    Match {
        chromosome: "chr1".to_string(),
        start,
        end,
        strand,
        matched_sequence: "N".repeat((end - start + 1) as usize),
        marker_id: "m".to_string(),
        marker_length: end - start + 1,
        occurrence_count: 1,
        upstream: String::new(),
        downstream: String::new(),
    }
}

// -------------------------------------------------------------------------
// 1. Matching scenarios
// -------------------------------------------------------------------------

mod test_matching {
    use super::*;

    #[test]
    fn test_palindromic_marker_scenario() {
        let matches =
            match_markers(&[Marker::new("m1", "ACGT")], &scenario_reference(), &config_with_threads(1))
                .unwrap();

        let starts: Vec<u64> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 4, 10]);
        for m in &matches {
            assert_eq!(m.end, m.start + 3);
            assert_eq!(m.strand, MatchStrand::Forward);
            assert_eq!(m.occurrence_count, 3);
            assert_eq!(m.marker_id, "m1");
        }
    }

    #[test]
    fn test_absent_marker_scenario() {
        let matches =
            match_markers(&[Marker::new("m2", "GGGG")], &scenario_reference(), &config_with_threads(1))
                .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_absent_marker_among_present_ones() {
        let markers = vec![
            Marker::new("m1", "ACGT"),
            Marker::new("m2", "GGGG"),
            Marker::new("m3", "TTTA"),
        ];
        let matches = match_markers(&markers, &scenario_reference(), &config_with_threads(3)).unwrap();
        assert!(matches.iter().all(|m| m.marker_id != "m2"));
    }

    #[test]
    fn test_occurrence_count_equals_forward_plus_reverse() {
        let reference = Reference::new("chr1", "AACCGGTTAACCAAGG");
        for seq in ["AA", "CC", "AAC", "GT", "TTAA"] {
            let marker = Marker::new(seq, seq);
            let forward = find_occurrences(&reference.sequence, seq.as_bytes()).len();
            let rc = reverse_complement(seq.as_bytes());
            let reverse = if rc == seq.as_bytes() {
                0
            } else {
                find_occurrences(&reference.sequence, &rc).len()
            };

            let matches = match_marker(&marker, &reference, 20);
            assert_eq!(matches.len(), forward + reverse, "marker {seq}");
            assert!(matches
                .iter()
                .all(|m| m.occurrence_count as usize == forward + reverse));
        }
    }

    #[test]
    fn test_palindromes_never_report_reverse_hits() {
        let reference = Reference::new("chr1", "GAATTCGAATTCAT");
        let matches = match_marker(&Marker::new("ecori", "GAATTC"), &reference, 20);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.strand == MatchStrand::Forward));
    }

    #[test]
    fn test_match_invariants_hold_for_every_record() {
        let reference = Reference::new("chr1", "TTGACCATGGTCAATTGACCAAGGTC");
        let markers = vec![
            Marker::new("a", "GACC"),
            Marker::new("b", "TTGA"),
            Marker::new("c", "CAAGG"),
        ];
        let matches = match_markers(&markers, &reference, &config_with_threads(2)).unwrap();
        assert!(!matches.is_empty());

        for m in &matches {
            assert!(m.start <= m.end);
            assert_eq!(m.end - m.start + 1, m.marker_length);
            assert!(m.upstream.len() <= 20 && m.downstream.len() <= 20);
            let span = &reference.sequence[m.start as usize..=m.end as usize];
            assert_eq!(span, m.matched_sequence.as_bytes());
        }
    }

    #[test]
    fn test_context_bounded_by_size_and_reference() {
        let reference = b"ACGTACGTTTACGT";
        for size in [0, 1, 5, 20] {
            for start in 0..reference.len() {
                let (up, down) = extract_context(reference, start, start, size);
                assert!(up.len() <= size && down.len() <= size);
                assert_eq!(up.len(), start.min(size));
                assert_eq!(down.len(), (reference.len() - 1 - start).min(size));
            }
        }
    }

    #[test]
    fn test_revcomp_involution() {
        for seq in ["A", "AC", "GATTACA", "TTTTGGGGCCCCAAAA", "ACGTTGCA"] {
            assert_eq!(
                reverse_complement(&reverse_complement(seq.as_bytes())),
                seq.as_bytes()
            );
        }
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let reference = Reference::new("chr1", "ACGTTGCAACGTTTGCAAACGTGGT");
        let markers: Vec<Marker> = ["ACG", "TTG", "GCA", "CAA", "GGT", "AAC", "TGC"]
            .iter()
            .enumerate()
            .map(|(i, s)| Marker::new(format!("m{i}"), *s))
            .collect();

        let sequential = match_markers(&markers, &reference, &config_with_threads(1)).unwrap();
        let parallel = match_markers(&markers, &reference, &config_with_threads(4)).unwrap();
        assert_eq!(sequential, parallel);
    }
}

// -------------------------------------------------------------------------
// 2. Annotation scenarios
// -------------------------------------------------------------------------

mod test_annotation {
    use super::*;

    #[test]
    fn test_gene_overlap_scenario() {
        let config = Config::default();
        let features = scenario_features(&config);

        let hit = overlapping_gene(&features.genes, "chr1", 100, 110, Strand::Positive).unwrap();
        assert_eq!(hit.gene_id, "GPLUS");
        assert_eq!(hit.overlap, 11);
    }

    #[test]
    fn test_gene_lookup_never_crosses_strands() {
        let config = Config::default();
        let features = scenario_features(&config);

        for start in (0..500).step_by(7) {
            for strand in [MatchStrand::Forward, MatchStrand::Reverse] {
                let annotated = annotate_match(&make_match(start, start + 10, strand), &features);
                if let Some(gene) = annotated.gene {
                    let expected = match strand {
                        MatchStrand::Forward => "GPLUS",
                        MatchStrand::Reverse => "GMINUS",
                    };
                    assert_eq!(gene.gene_id, expected);
                }
            }
        }
    }

    #[test]
    fn test_cpg_and_repeat_outside_sorted_range() {
        let config = Config::default();
        let features = scenario_features(&config);

        let before = annotate_match(&make_match(10, 20, MatchStrand::Forward), &features);
        assert!(!before.in_cpg());
        assert!(before.repeat.is_none());

        let after = annotate_match(&make_match(1000, 1010, MatchStrand::Forward), &features);
        assert!(!after.in_cpg());
        assert!(after.repeat.is_none());

        let line = format_annotated_line(&after);
        assert!(line.ends_with("\tfalse\t0\t0\tNo\tNone\t0"));
    }

    #[test]
    fn test_full_annotation_line() {
        let config = Config::default();
        let features = scenario_features(&config);

        let annotated = annotate_match(&make_match(100, 110, MatchStrand::Forward), &features);
        assert_eq!(
            format_annotated_line(&annotated),
            "100\t110\tF\tNNNNNNNNNNN\t1\tchr1\tGPLUS\t5\tprotein_coding\tPLUS1\tGPLUS\tprotein_coding\tPLUS1\tfalse\t0\t0\tAluSx\tSINE\t14"
        );
    }

    #[test]
    fn test_nearest_tss_missing_synonym_renders_na() {
        let config = Config::default();
        let features = scenario_features(&config);

        let annotated = annotate_match(&make_match(480, 490, MatchStrand::Reverse), &features);
        let tss = annotated.tss.as_ref().unwrap();
        assert_eq!(tss.gene_id, "GMINUS");
        assert_eq!(tss.distance, 20);
        assert_eq!(tss.synonyms, "N/A");
    }

    #[test]
    fn test_match_then_annotate() {
        let config = config_with_threads(2);
        let reference = Reference::new("chr1", "ACGTACGTTTACGT");
        let features = FeatureIndex {
            genes: load_genes(
                rows("chr1\tens\tgene\t2\t6\t.\t+\t.\tID=gene:G1;Name=ONE;biotype=protein_coding"),
                &config,
            ),
            tss: load_tss(
                rows("h\th\th\th\th\th\th\nG1\tT1\tchr1\t2\t1\tprotein_coding\tONE"),
                &config,
            ),
            cpg: load_cpg(rows("1\tchr1\t9\t12\tCpG: 2\t4\t2\t3\t50.0\t75.0\t1.2")),
            repeats: load_repeats(rows("chr1\t0\t3\t(ACGT)n\tSimple_repeat\t-")),
        };

        let matches = match_markers(&[Marker::new("m1", "ACGT")], &reference, &config).unwrap();
        let annotated = annotate_matches(&matches, &features, &config).unwrap();
        assert_eq!(annotated.len(), 3);

        // [0,3]: gene [2,6] overlaps by 2, no CpG, repeat is on the other strand
        assert_eq!(annotated[0].gene.as_ref().unwrap().overlap, 2);
        assert!(!annotated[0].in_cpg());
        assert!(annotated[0].repeat.is_none());
        assert_eq!(annotated[0].tss.as_ref().unwrap().distance, 2);

        // [4,7]: gene overlaps by 3
        assert_eq!(annotated[1].gene.as_ref().unwrap().overlap, 3);

        // [10,13]: CpG [9,12], no gene
        assert!(annotated[2].in_cpg());
        assert!(annotated[2].gene.is_none());
        assert_eq!(annotated[2].cpg.as_ref().unwrap().gc_content, 75.0);

        assert_eq!(
            format_match_line(&matches[2]),
            "10\t13\tF\tACGT\tm1\t4\t3\tACGTACGTTT\t"
        );
    }
}
