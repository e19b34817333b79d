use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Side;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupParseError {
    #[error("unexpected character {ch:?} at offset {offset} in layer group string")]
    UnexpectedChar { offset: usize, ch: char },

    #[error("layer {layer} does not exist (board has {copper_layers} copper layers)")]
    LayerOutOfRange { layer: usize, copper_layers: usize },

    #[error("layer group string defines more than {max} groups")]
    TooManyGroups { max: usize },
}

/// Physical layers clustered into logical groups. Group `g` lists the layer
/// indices that are treated as one copper/silk plane.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerGroups {
    groups: Vec<Vec<usize>>,
}

impl LayerGroups {
    #[must_use]
    pub fn new(groups: Vec<Vec<usize>>) -> Self {
        Self { groups }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn members(&self, group: usize) -> &[usize] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group containing `layer`, by linear scan.
    ///
    /// A layer listed in no group resolves to the scan's terminal value (the
    /// group count), which never matches a side group.
    #[must_use]
    pub fn group_of_layer(&self, layer: usize) -> usize {
        let mut group = 0;
        while group < self.groups.len() {
            if self.members(group).contains(&layer) {
                return group;
            }
            group += 1;
        }
        group
    }

    /// Group holding the silk layer of `side`.
    #[must_use]
    pub fn group_of_side(&self, side: Side, max_copper_layer: usize) -> usize {
        self.group_of_layer(side.silk_layer(max_copper_layer))
    }

    /// Parse a group string such as `"1,c:2:3,s"`.
    ///
    /// Groups are separated by `:`, members by `,`. Digits name 1-based copper
    /// layers, `c`/`C` the top silk layer and `s`/`S` the bottom silk layer. When
    /// a silk layer is not mentioned it joins group 0 (bottom) or group 1 (top).
    pub fn parse(input: &str, copper_layers: usize) -> Result<Self, GroupParseError> {
        let bottom_silk = Side::Bottom.silk_layer(copper_layers);
        let top_silk = Side::Top.silk_layer(copper_layers);
        let chars: Vec<char> = input.chars().collect();
        let mut pos = 0;
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut top_set = false;
        let mut bottom_set = false;

        let skip_ws = |pos: &mut usize| {
            while *pos < chars.len() && chars[*pos].is_whitespace() {
                *pos += 1;
            }
        };

        skip_ws(&mut pos);
        while pos < chars.len() {
            if groups.len() >= copper_layers.max(2) {
                return Err(GroupParseError::TooManyGroups {
                    max: copper_layers.max(2),
                });
            }
            let mut members = Vec::new();
            loop {
                skip_ws(&mut pos);
                let Some(&ch) = chars.get(pos) else {
                    break;
                };
                let layer = match ch {
                    'c' | 'C' => {
                        top_set = true;
                        pos += 1;
                        top_silk
                    }
                    's' | 'S' => {
                        bottom_set = true;
                        pos += 1;
                        bottom_silk
                    }
                    d if d.is_ascii_digit() => {
                        let start = pos;
                        while pos < chars.len() && chars[pos].is_ascii_digit() {
                            pos += 1;
                        }
                        let digits: String = chars[start..pos].iter().collect();
                        let number: usize = digits.parse().unwrap_or(0);
                        if number == 0 || number > copper_layers {
                            return Err(GroupParseError::LayerOutOfRange {
                                layer: number,
                                copper_layers,
                            });
                        }
                        number - 1
                    }
                    other => {
                        return Err(GroupParseError::UnexpectedChar {
                            offset: pos,
                            ch: other,
                        })
                    }
                };
                members.push(layer);

                skip_ws(&mut pos);
                match chars.get(pos) {
                    None | Some(':') => break,
                    Some(',') => pos += 1,
                    Some(&other) => {
                        return Err(GroupParseError::UnexpectedChar {
                            offset: pos,
                            ch: other,
                        })
                    }
                }
            }
            groups.push(members);
            if chars.get(pos) == Some(&':') {
                pos += 1;
            }
            skip_ws(&mut pos);
        }

        if groups.len() < 2 && !(top_set && bottom_set) {
            groups.resize_with(2, Vec::new);
        }
        if !bottom_set {
            groups[0].push(bottom_silk);
        }
        if !top_set {
            groups[1].push(top_silk);
        }
        Ok(Self { groups })
    }
}

impl From<Vec<Vec<usize>>> for LayerGroups {
    fn from(groups: Vec<Vec<usize>>) -> Self {
        Self::new(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classic_two_layer_string() {
        let groups = LayerGroups::parse("1,c:2,s", 2).unwrap();
        assert_eq!(groups.members(0), &[0, 3]);
        assert_eq!(groups.members(1), &[1, 2]);
        assert_eq!(groups.group_of_side(Side::Top, 2), 0);
        assert_eq!(groups.group_of_side(Side::Bottom, 2), 1);
    }

    #[test]
    fn missing_silk_layers_join_default_groups() {
        let groups = LayerGroups::parse("1:2:3,4", 4).unwrap();
        assert_eq!(groups.members(0), &[0, 4]);
        assert_eq!(groups.members(1), &[1, 5]);
        assert_eq!(groups.members(2), &[2, 3]);
    }

    #[test]
    fn whitespace_is_ignored() {
        let groups = LayerGroups::parse(" 1 , c : 2 , s ", 2).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.members(1), &[1, 2]);
    }

    #[test]
    fn rejects_unknown_characters_and_layers() {
        assert_eq!(
            LayerGroups::parse("1,x", 2),
            Err(GroupParseError::UnexpectedChar { offset: 2, ch: 'x' })
        );
        assert_eq!(
            LayerGroups::parse("1,c:5,s", 2),
            Err(GroupParseError::LayerOutOfRange {
                layer: 5,
                copper_layers: 2
            })
        );
        assert!(matches!(
            LayerGroups::parse("1:2:c:s", 2),
            Err(GroupParseError::TooManyGroups { .. })
        ));
    }

    #[test]
    fn unknown_layer_falls_back_to_group_count() {
        let groups = LayerGroups::new(vec![vec![0, 3], vec![1, 2]]);
        assert_eq!(groups.group_of_layer(1), 1);
        assert_eq!(groups.group_of_layer(9), 2);
        assert_eq!(LayerGroups::default().group_of_layer(0), 0);
    }
}
