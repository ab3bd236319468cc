use crate::models::SectionSummary;

/// Art direction for one visual style
pub struct StylePreset {
    pub name: &'static str,
    description: &'static str,
    colors: &'static str,
    layout: &'static str,
    visual_direction: &'static str,
}

/// Available style preset names, in menu order
pub const STYLE_NAMES: [&str; 7] = [
    "davinci",
    "magazine",
    "comic",
    "geek",
    "chalkboard",
    "collage",
    "newspaper",
];

static PRESETS: [StylePreset; 7] = [
    StylePreset {
        name: "davinci",
        description: "Renaissance-era scientific manuscript style inspired by Leonardo da Vinci's notebooks. \
            Hand-drawn ink illustrations on aged parchment with a warm sepia tone, text in elegant serif \
            calligraphy, anatomical-style diagrams and mechanical sketches annotating each concept. \
            The overall feel is a page torn from a genius inventor's private journal.",
        colors: "Aged yellowed parchment background with dark brown and sepia ink. Occasional red-brown \
            ink accents for emphasis. Subtle coffee-stain watermarks.",
        layout: "Asymmetric hand-drawn layout. Title in large ornate calligraphy at top. Key points \
            scattered with connecting arrows and sketch annotations. Small anatomical or mechanical \
            diagrams interspersed between text blocks. Context text at bottom in smaller italic script.",
        visual_direction: "Draw detailed pen-and-ink sketches: gears, pulleys, human figures in motion, \
            botanical cross-sections, geometric constructions with compass and ruler marks. Include faint \
            grid lines and measurement notations in the margins.",
    },
    StylePreset {
        name: "magazine",
        description: "Fashion editorial magazine spread in the manner of Vogue or Harper's Bazaar. Big \
            dramatic headlines in bold condensed or elegant serif type with extreme size contrast, an \
            asymmetrical layout mixing photography, text blocks and pull quotes with editorial intention. \
            High-fashion, confident, visually luxurious.",
        colors: "Stark black and white with a single pop color (crimson, electric pink, or gold), or a \
            rich tonal palette of burgundy, cream and charcoal. Generous white space. Accent color \
            reserved for drop caps, pull quotes, or a single bold word.",
        layout: "Asymmetrical editorial spread anchored by an oversized headline, possibly set at an \
            angle. Key points in an elegant column alongside or overlapping a large feature image. A \
            styled pull quote in large italic breaks the layout. Summary in a refined narrow column; \
            slide number as a small folio marker.",
        visual_direction: "Include a large editorial-style image or illustration as the visual anchor. \
            Text wraps around or overlays imagery with confidence. Drop caps for key sections; pull \
            quotes set large with thin rule lines above and below.",
    },
    StylePreset {
        name: "comic",
        description: "Vibrant comic book / pop art infographic. Bold black outlines around everything, \
            Ben-Day dots and halftone patterns, explosive starburst shapes, speech bubbles for key \
            points, dynamic diagonal compositions with action lines. Energetic and immediately \
            eye-catching, like a page from a Marvel comic.",
        colors: "Bright saturated primaries: bold red, electric blue, sunshine yellow, vivid green. Thick \
            black outlines and borders. White speech bubbles with black text. Ben-Day dot backgrounds; \
            starburst shapes in contrasting colors for emphasis.",
        layout: "Comic panel layout with dynamic asymmetric panels and thick black borders. Headline in a \
            large explosive starburst or banner at the top. Each key point gets its own panel with a \
            small cartoon illustration and speech bubble. Context text in a narrator box at the bottom; \
            slide number in a circle badge.",
        visual_direction: "Draw cartoon characters reacting to the content. Use comic onomatopoeia (POW, \
            ZAP, BOOM) as decorative elements where appropriate. Action lines radiate from important \
            points; small comic-style icons for each concept.",
    },
    StylePreset {
        name: "geek",
        description: "College bulletin board aesthetic: kraft paper or corkboard background with content \
            pinned using colorful pushpins and tape. Mix of handwritten marker text, typed index cards, \
            printed photos and sticky notes, with stickers, doodles and highlighter marks. Authentic, \
            nerdy, lovingly chaotic.",
        colors: "Warm cork/kraft paper base. Neon sticky notes in pink, yellow, green, blue. Red and blue \
            marker handwriting, black Sharpie headlines, highlighter-yellow streaks over important words, \
            colorful pushpin dots.",
        layout: "Deliberately messy collage pinned to a corkboard. Headline scrawled in thick black \
            marker, slightly tilted, at top center. Key points on individual sticky notes or index cards \
            pinned at slight angles, red string connecting related concepts. Context text on a torn \
            notebook page pinned at the bottom.",
        visual_direction: "Include hand-drawn doodles: stick figures, flowcharts, arrows, stars, \
            lightbulbs, coffee cup rings, small printed diagrams taped on. Some elements look like \
            printouts, others like handwritten notes.",
    },
    StylePreset {
        name: "chalkboard",
        description: "Photograph of a real black chalkboard in a classroom, with a worn wooden frame \
            under fluorescent lighting. ALL text is handwritten in chalk with natural hand pressure \
            variation: thick downstrokes, thin upstrokes, chalk skipping on rough slate. It should look \
            like a photo of a lecture hall blackboard after an incredible class, not a digital \
            illustration styled to look like chalk.",
        colors: "True matte black chalkboard surface. White chalk dominant with natural brightness \
            variation; occasional yellow or pale blue chalk for underlines or circled terms, sparingly. \
            Faint ghosting of previously erased content as gray smudges.",
        layout: "Organic lecture-notes layout. Title handwritten large across the top, underlined once. \
            Key points flow down the board as bullet dashes, slightly drifting as a real hand would. \
            Arrows connect related ideas; a boxed handwritten summary near the bottom. The wooden chalk \
            tray is visible with chalk stubs and a felt eraser.",
        visual_direction: "Every letter looks written by a human hand holding chalk, with natural \
            inconsistencies in size, spacing and slant. Chalk lines have grain texture from the slate. \
            Diagrams are simple and hand-drawn: boxes, arrows, circles, brackets. Eraser smudges where \
            the board was wiped imperfectly; fine chalk dust near the tray. No digital effects or glow.",
    },
    StylePreset {
        name: "collage",
        description: "Digital collage with dreamcore and ASCII aesthetics: a surreal mixed-media \
            composition layering ASCII art text blocks, handwritten scrawls, cut-out imagery and glitched \
            gradients. ALL text is loose handwriting, scratchy and uneven. Late-night internet, liminal \
            spaces, analog-digital fusion: hypnotic, slightly eerie, deeply aesthetic.",
        colors: "Background varies freely: washed-out cream with noise grain, soft pink-lavender \
            gradient, deep navy, or layered collage textures. Terminal green and phosphor amber accents \
            in ASCII fragments; soft pastel dreamcore washes; harsh white or black handwritten overlays; \
            occasional magenta or cyan glitch streaks.",
        layout: "Deliberately fragmented. Title handwritten large and loose, off-center or at a slight \
            angle. Key points as handwritten snippets on torn paper scraps or translucent overlays at \
            slight rotations, some framed with ASCII box-drawing borders. Summary handwritten in a \
            terminal-inspired block. Elements overlap at different depths.",
        visual_direction: "No clean digital typography anywhere. Handwriting mixes with ASCII art \
            patterns and code-like text blocks. Layer dreamy photographic cutouts of empty hallways, \
            clouds, windows. Subtle scanline or CRT texture over portions; small fragments like a \
            staircase going nowhere, a pixelated eye, a wireframe sphere.",
    },
    StylePreset {
        name: "newspaper",
        description: "Vintage newspaper broadsheet from the early 20th century, with the authoritative \
            gravitas of The New York Times circa 1920s-1940s. Bold serif headlines in large point sizes, \
            dense multi-column text, detailed engraving-style illustrations. Historic, weighty, credible.",
        colors: "Strictly black ink on clean white paper: no color, no sepia. Rich dense blacks for \
            headlines and engravings, medium gray for body text, bright crisp paper background. Ink \
            density variation gives depth.",
        layout: "Traditional newspaper column layout. A bold serif headline spans the full width, with a \
            secondary deck headline below. Content in 2-3 justified columns with thin vertical rules. Key \
            points as paragraphs with bold lead-ins; an engraving-style illustration anchors one column. \
            Summary as a boxed sidebar; slide number styled as a page number with a date line.",
        visual_direction: "Detailed engraving-style illustrations: crosshatched portraits, technical \
            diagrams, allegorical figures in fine black ink lines, like woodcut reproductions on \
            newsprint. Bold serif typography with thick/thin stroke contrast; thin hairline rules \
            separating sections.",
    },
];

/// Look up a preset by name, defaulting to davinci for unknown styles
pub fn style_preset(name: &str) -> &'static StylePreset {
    PRESETS
        .iter()
        .find(|p| p.name == name)
        .unwrap_or(&PRESETS[0])
}

/// Build the image generation prompt for one slide
pub fn build_infographic_prompt(
    summary: &SectionSummary,
    video_title: &str,
    total_sections: usize,
    style: &str,
    aspect_ratio: &str,
) -> String {
    let preset = style_preset(style);
    let key_points_text = summary
        .key_points
        .iter()
        .enumerate()
        .map(|(i, point)| format!("  {}. {}", i + 1, point))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Generate an image of a single infographic slide. Slide {index} of {total} from "{video_title}".

=== ART DIRECTION ===
{description}

=== COLOR PALETTE ===
{colors}

=== COMPOSITION & LAYOUT ===
{layout}

=== VISUAL ELEMENTS ===
{visual_direction}
Additional visual context from the content: {visual_suggestions}

=== TEXT CONTENT (render exactly as written) ===

TITLE:
"{headline}"

KEY POINTS:
{key_points}

SUMMARY:
"{summary_text}"

SLIDE: {index}/{total}

=== CRITICAL RULES ===
- Landscape {aspect_ratio} aspect ratio
- Every word of text must be spelled correctly and clearly readable
- The title must be the most prominent text element
- Do NOT add any text beyond what is specified above
- The image must look like a single cohesive infographic poster, not a photograph of a real scene
- Make it visually stunning and highly detailed"#,
        index = summary.section.index,
        total = total_sections,
        video_title = video_title,
        description = preset.description,
        colors = preset.colors,
        layout = preset.layout,
        visual_direction = preset.visual_direction,
        visual_suggestions = summary.visual_suggestions,
        headline = summary.headline,
        key_points = key_points_text,
        summary_text = summary.summary,
        aspect_ratio = aspect_ratio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    fn summary() -> SectionSummary {
        SectionSummary {
            section: Section {
                index: 3,
                title: "Topic".to_string(),
                start_seconds: 0.0,
                end_seconds: 60.0,
                transcript_text: String::new(),
            },
            headline: "Three Big Ideas".to_string(),
            key_points: vec!["first".to_string(), "second".to_string()],
            summary: "Some context.".to_string(),
            visual_suggestions: "a rocket".to_string(),
        }
    }

    #[test]
    fn test_every_named_style_has_a_preset() {
        for name in STYLE_NAMES {
            assert_eq!(style_preset(name).name, name);
        }
    }

    #[test]
    fn test_unknown_style_falls_back_to_davinci() {
        assert_eq!(style_preset("vaporwave").name, "davinci");
    }

    #[test]
    fn test_prompt_contains_all_text_content() {
        let prompt = build_infographic_prompt(&summary(), "My Video", 7, "comic", "16:9");

        assert!(prompt.contains("Slide 3 of 7"));
        assert!(prompt.contains("My Video"));
        assert!(prompt.contains("Three Big Ideas"));
        assert!(prompt.contains("  1. first"));
        assert!(prompt.contains("  2. second"));
        assert!(prompt.contains("Some context."));
        assert!(prompt.contains("a rocket"));
        assert!(prompt.contains("16:9 aspect ratio"));
        assert!(prompt.contains("Ben-Day"));
    }
}
