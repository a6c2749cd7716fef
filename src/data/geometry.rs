use thiserror::Error;

// ---------------------------------------------------------------------------
// Geometry types
// ---------------------------------------------------------------------------

/// A single `(x, y)` coordinate (longitude, latitude for the province maps).
pub type Coord = [f64; 2];

/// A closed ring of coordinates. The first and last coordinate are equal.
pub type Ring = Vec<Coord>;

/// One polygon: exterior ring followed by zero or more holes.
/// An empty vector is the WKT `POLYGON EMPTY`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// Province outline parsed from the `geometry` column.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    /// Parse a `POLYGON` or `MULTIPOLYGON` well-known-text string.
    pub fn from_wkt(text: &str) -> Result<Self, GeometryParseError> {
        Parser::new(text).parse()
    }

    /// All member polygons, regardless of the WKT type.
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(p) => std::slice::from_ref(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons().iter().all(Polygon::is_empty)
    }

    /// Area-weighted centroid of the geometry.
    ///
    /// Holes subtract from the area. A shape with zero area falls back to the
    /// mean of its exterior vertices; an empty shape has no centroid.
    pub fn centroid(&self) -> Option<Coord> {
        let mut area_sum = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for polygon in self.polygons() {
            for (i, ring) in polygon.rings.iter().enumerate() {
                let (signed, mx, my) = ring_moments(ring);
                if signed == 0.0 {
                    continue;
                }
                // Ring orientation is not guaranteed, so weight by |area|.
                let weight = if i == 0 { signed.abs() } else { -signed.abs() };
                area_sum += weight;
                cx += weight * mx / signed;
                cy += weight * my / signed;
            }
        }

        if area_sum.abs() > f64::EPSILON {
            return Some([cx / area_sum, cy / area_sum]);
        }

        let vertices: Vec<&Coord> = self
            .polygons()
            .iter()
            .filter_map(Polygon::exterior)
            .flatten()
            .collect();
        if vertices.is_empty() {
            return None;
        }
        let n = vertices.len() as f64;
        let (sx, sy) = vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c[0], sy + c[1]));
        Some([sx / n, sy / n])
    }
}

/// Signed shoelace area of a ring with its first moments `(area, Mx, My)`.
/// The ring centroid is `(Mx / area, My / area)`.
fn ring_moments(ring: &Ring) -> (f64, f64, f64) {
    let mut a = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;
    for w in ring.windows(2) {
        let cross = w[0][0] * w[1][1] - w[1][0] * w[0][1];
        a += cross;
        x += (w[0][0] + w[1][0]) * cross;
        y += (w[0][1] + w[1][1]) * cross;
    }
    (a / 2.0, x / 6.0, y / 6.0)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryParseError {
    #[error("geometry text is blank")]
    Blank,
    #[error("unsupported geometry type `{0}` (expected POLYGON or MULTIPOLYGON)")]
    UnsupportedType(String),
    #[error("expected {expected} at offset {offset}")]
    Unexpected { expected: &'static str, offset: usize },
    #[error("invalid number `{text}` at offset {offset}")]
    InvalidNumber { text: String, offset: usize },
    #[error("ring at offset {offset} has {points} distinct points, at least 3 are required")]
    TooFewPoints { points: usize, offset: usize },
    #[error("ring at offset {offset} does not end on its first point")]
    UnclosedRing { offset: usize },
    #[error("unexpected trailing input at offset {0}")]
    TrailingInput(usize),
}

// ---------------------------------------------------------------------------
// WKT parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    Open,
    Close,
    Comma,
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser { text, pos: 0 }
    }

    fn parse(mut self) -> Result<Geometry, GeometryParseError> {
        let offset = self.skip_ws();
        let tag = match self.next_token()? {
            None => return Err(GeometryParseError::Blank),
            Some(Token::Word(w)) => w.to_ascii_uppercase(),
            Some(_) => {
                return Err(GeometryParseError::Unexpected {
                    expected: "geometry type",
                    offset,
                })
            }
        };

        self.skip_dimension_tag()?;

        let geometry = match tag.as_str() {
            "POLYGON" => Geometry::Polygon(self.polygon()?),
            "MULTIPOLYGON" => Geometry::MultiPolygon(self.multipolygon()?),
            _ => return Err(GeometryParseError::UnsupportedType(tag)),
        };

        let offset = self.skip_ws();
        match self.next_token()? {
            None => Ok(geometry),
            Some(_) => Err(GeometryParseError::TrailingInput(offset)),
        }
    }

    /// Accepts and ignores `Z`, `M` or `ZM` after the type name.
    fn skip_dimension_tag(&mut self) -> Result<(), GeometryParseError> {
        let save = self.pos;
        if let Some(Token::Word(w)) = self.next_token()? {
            if matches!(w.to_ascii_uppercase().as_str(), "Z" | "M" | "ZM") {
                return Ok(());
            }
        }
        self.pos = save;
        Ok(())
    }

    fn is_empty_keyword(&mut self) -> Result<bool, GeometryParseError> {
        let save = self.pos;
        if let Some(Token::Word(w)) = self.next_token()? {
            if w.eq_ignore_ascii_case("EMPTY") {
                return Ok(true);
            }
        }
        self.pos = save;
        Ok(false)
    }

    fn multipolygon(&mut self) -> Result<Vec<Polygon>, GeometryParseError> {
        if self.is_empty_keyword()? {
            return Ok(Vec::new());
        }
        self.expect(Token::Open, "'('")?;
        let mut polygons = vec![self.polygon()?];
        while self.list_continues()? {
            polygons.push(self.polygon()?);
        }
        Ok(polygons)
    }

    fn polygon(&mut self) -> Result<Polygon, GeometryParseError> {
        if self.is_empty_keyword()? {
            return Ok(Polygon::default());
        }
        self.expect(Token::Open, "'('")?;
        let mut rings = vec![self.ring()?];
        while self.list_continues()? {
            rings.push(self.ring()?);
        }
        Ok(Polygon { rings })
    }

    fn ring(&mut self) -> Result<Ring, GeometryParseError> {
        let offset = self.skip_ws();
        self.expect(Token::Open, "'('")?;
        let mut ring = vec![self.coord()?];
        while self.list_continues()? {
            ring.push(self.coord()?);
        }

        if ring.first() != ring.last() {
            return Err(GeometryParseError::UnclosedRing { offset });
        }
        let distinct = ring.len() - 1;
        if distinct < 3 {
            return Err(GeometryParseError::TooFewPoints {
                points: distinct,
                offset,
            });
        }
        Ok(ring)
    }

    fn coord(&mut self) -> Result<Coord, GeometryParseError> {
        let x = self.number()?;
        let y = self.number()?;
        // Drop any Z / M ordinates.
        loop {
            let save = self.pos;
            match self.next_token()? {
                Some(Token::Number(_)) => continue,
                _ => {
                    self.pos = save;
                    break;
                }
            }
        }
        Ok([x, y])
    }

    fn number(&mut self) -> Result<f64, GeometryParseError> {
        let offset = self.skip_ws();
        match self.next_token()? {
            Some(Token::Number(v)) => Ok(v),
            _ => Err(GeometryParseError::Unexpected {
                expected: "number",
                offset,
            }),
        }
    }

    /// After a list element: `,` means another element follows, `)` closes the list.
    fn list_continues(&mut self) -> Result<bool, GeometryParseError> {
        let offset = self.skip_ws();
        match self.next_token()? {
            Some(Token::Comma) => Ok(true),
            Some(Token::Close) => Ok(false),
            _ => Err(GeometryParseError::Unexpected {
                expected: "',' or ')'",
                offset,
            }),
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), GeometryParseError> {
        let offset = self.skip_ws();
        match self.next_token()? {
            Some(t) if t == token => Ok(()),
            _ => Err(GeometryParseError::Unexpected { expected, offset }),
        }
    }

    fn skip_ws(&mut self) -> usize {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
        self.pos
    }

    fn next_token(&mut self) -> Result<Option<Token>, GeometryParseError> {
        let start = self.skip_ws();
        let rest = &self.text[start..];
        let Some(c) = rest.chars().next() else {
            return Ok(None);
        };

        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            ',' => Token::Comma,
            c if c.is_ascii_alphabetic() => {
                let len = rest
                    .find(|ch: char| !ch.is_ascii_alphabetic())
                    .unwrap_or(rest.len());
                self.pos += len;
                return Ok(Some(Token::Word(rest[..len].to_string())));
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                let len = rest
                    .find(|ch: char| {
                        !(ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E'))
                    })
                    .unwrap_or(rest.len());
                let text = &rest[..len];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| GeometryParseError::InvalidNumber {
                        text: text.to_string(),
                        offset: start,
                    })?;
                self.pos += len;
                return Ok(Some(Token::Number(value)));
            }
            _ => {
                return Err(GeometryParseError::Unexpected {
                    expected: "WKT token",
                    offset: start,
                })
            }
        };
        self.pos += c.len_utf8();
        Ok(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn parses_closed_polygon() {
        let g = Geometry::from_wkt("POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
        let Geometry::Polygon(p) = &g else {
            panic!("expected polygon, got {g:?}");
        };
        let ring = p.exterior().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn parses_multipolygon_with_hole_and_z() {
        let g = Geometry::from_wkt(
            "multipolygon z (((0 0 1, 10 0 1, 10 10 1, 0 10 1, 0 0 1), (2 2, 4 2, 4 4, 2 4, 2 2)), ((20 0, 21 0, 21 1, 20 1, 20 0)))",
        )
        .unwrap();
        assert_eq!(g.polygons().len(), 2);
        assert_eq!(g.polygons()[0].rings.len(), 2);
    }

    #[test]
    fn centroid_of_square_is_its_middle() {
        let g = Geometry::from_wkt("POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
        let [x, y] = g.centroid().unwrap();
        assert!((x - 2.0).abs() < EPS && (y - 2.0).abs() < EPS);
    }

    #[test]
    fn centroid_is_orientation_independent() {
        let g = Geometry::from_wkt("POLYGON ((0 0, 0 2, 6 2, 6 0, 0 0))").unwrap();
        let [x, y] = g.centroid().unwrap();
        assert!((x - 3.0).abs() < EPS && (y - 1.0).abs() < EPS);
    }

    #[test]
    fn hole_shifts_centroid_away() {
        let g = Geometry::from_wkt(
            "POLYGON ((0 0, 4 0, 4 2, 0 2, 0 0), (0 0, 0 2, 2 2, 2 0, 0 0))",
        )
        .unwrap();
        let [x, _] = g.centroid().unwrap();
        assert!((x - 3.0).abs() < EPS, "x = {x}");
    }

    #[test]
    fn empty_geometry_has_no_centroid() {
        let g = Geometry::from_wkt("POLYGON EMPTY").unwrap();
        assert!(g.is_empty());
        assert_eq!(g.centroid(), None);
        let g = Geometry::from_wkt("MULTIPOLYGON EMPTY").unwrap();
        assert_eq!(g.centroid(), None);
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert_eq!(Geometry::from_wkt("   "), Err(GeometryParseError::Blank));
        assert!(matches!(
            Geometry::from_wkt("POINT (1 2)"),
            Err(GeometryParseError::UnsupportedType(t)) if t == "POINT"
        ));
        assert!(matches!(
            Geometry::from_wkt("POLYGON ((0 0, 1 0, 1 1, 0 0)"),
            Err(GeometryParseError::Unexpected { .. })
        ));
        assert!(matches!(
            Geometry::from_wkt("POLYGON ((0 0, 1 0, 0 0))"),
            Err(GeometryParseError::TooFewPoints { points: 2, .. })
        ));
        assert!(matches!(
            Geometry::from_wkt("POLYGON ((0 0, 1 0, 1 1, 0 0)) junk"),
            Err(GeometryParseError::TrailingInput(_))
        ));
        assert!(matches!(
            Geometry::from_wkt("POLYGON ((0 0, 1 0, 1 1-, 0 0))"),
            Err(GeometryParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn unclosed_ring_is_rejected() {
        assert!(matches!(
            Geometry::from_wkt("POLYGON ((0 0, 1 0, 1 1))"),
            Err(GeometryParseError::UnclosedRing { offset: 9 })
        ));
        assert!(matches!(
            Geometry::from_wkt("MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)), ((5 5, 6 5, 6 6)))"),
            Err(GeometryParseError::UnclosedRing { .. })
        ));
    }

    #[test]
    fn zero_area_centroid_is_vertex_mean() {
        let g = Geometry::from_wkt("POLYGON ((0 0, 1 1, 2 2, 0 0))").unwrap();
        assert!(!g.is_empty());
        let [x, y] = g.centroid().unwrap();
        // Mean over the stored ring, closing point included.
        assert!((x - 0.75).abs() < EPS && (y - 0.75).abs() < EPS, "({x}, {y})");
    }
}
