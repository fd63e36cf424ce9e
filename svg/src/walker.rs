use std::collections::HashMap;

use svgplot_geom::{parse_transform_list, Transform, TransformChain, TransformParseError, V2};

use crate::element::Element;

#[derive(thiserror::Error, Debug)]
pub enum WalkError {
    #[error("<use> references unknown id '#{0}'")]
    UnresolvedUse(String),
    #[error("<use> cycle detected: {}", .0.join(" -> "))]
    UseCycle(Vec<String>),
    #[error(transparent)]
    Transform(#[from] TransformParseError),
}

fn own_chain(el: &Element, parent: &TransformChain) -> Result<TransformChain, WalkError> {
    let mut chain = parent.clone();
    if let Some(s) = el.transform_str() {
        let (parsed, _skipped) = parse_transform_list(s)?;
        chain = chain.then(parsed);
    }
    Ok(chain)
}

fn collect_ids<'a>(el: &'a Element, map: &mut HashMap<String, &'a Element>) {
    if let Some(id) = el.id() {
        map.insert(id.to_string(), el);
    }
    if let Some(children) = el.children() {
        for child in children {
            collect_ids(child, map);
        }
    }
}

/// Walks the document, producing `(transform chain, leaf)` pairs in
/// document order. Containers fold their own transform into the chain
/// passed to their children. `Defs` subtrees are skipped entirely. `Use`
/// elements are resolved against the document's id map, with the
/// referenced subtree's own chain prefixed by a translation to the use
/// site; a self-referential or mutually-referential chain of `Use`s is
/// reported as a cycle rather than recursing forever. `Text` leaves are
/// logged and skipped.
pub fn walk(doc: &Element) -> Result<Vec<(TransformChain, Element)>, WalkError> {
    let mut id_map = HashMap::new();
    collect_ids(doc, &mut id_map);

    let mut out = Vec::new();
    let mut use_stack = Vec::new();
    walk_rec(doc, &TransformChain::new(), &id_map, &mut use_stack, &mut out)?;
    Ok(out)
}

fn walk_rec<'a>(
    el: &'a Element,
    parent_chain: &TransformChain,
    id_map: &HashMap<String, &'a Element>,
    use_stack: &mut Vec<String>,
    out: &mut Vec<(TransformChain, Element)>,
) -> Result<(), WalkError> {
    match el {
        Element::Defs { .. } => Ok(()),
        Element::Svg { children, .. } | Element::Group { children, .. } | Element::Anchor { children, .. } => {
            let chain = own_chain(el, parent_chain)?;
            for child in children {
                walk_rec(child, &chain, id_map, use_stack, out)?;
            }
            Ok(())
        }
        Element::Text { .. } => {
            log::warn!("skipping <text> element: text rendering is not supported");
            Ok(())
        }
        Element::Use { href, x, y, .. } => {
            let id = href.trim_start_matches('#').to_string();
            if use_stack.contains(&id) {
                let mut chain_names = use_stack.clone();
                chain_names.push(id);
                return Err(WalkError::UseCycle(chain_names));
            }
            let target = *id_map.get(&id).ok_or_else(|| WalkError::UnresolvedUse(id.clone()))?;
            let mut chain = own_chain(el, parent_chain)?;
            chain.push(Transform::Translate { offset: V2::new(*x, *y) });

            use_stack.push(id);
            let result = walk_rec(target, &chain, id_map, use_stack, out);
            use_stack.pop();
            result
        }
        leaf if leaf.is_leaf() => {
            let chain = own_chain(leaf, parent_chain)?;
            out.push((chain, leaf.clone()));
            Ok(())
        }
        _ => unreachable!("Element variant is neither container, Use, Text, nor leaf"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Header;

    fn line(id: &str, transform: Option<&str>) -> Element {
        Element::Line {
            header: Header { id: Some(id.to_string()), transform: transform.map(str::to_string) },
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 0.0,
        }
    }

    #[test]
    fn group_transform_folds_into_leaf_chain() {
        let doc = Element::Svg {
            header: Header::default(),
            children: vec![Element::Group {
                header: Header { id: None, transform: Some("translate(5,5)".to_string()) },
                children: vec![line("l1", None)],
            }],
        };
        let leaves = walk(&doc).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].0.apply(V2::new(0.0, 0.0)), V2::new(5.0, 5.0));
    }

    #[test]
    fn defs_subtree_is_skipped() {
        let doc = Element::Svg {
            header: Header::default(),
            children: vec![Element::Defs { header: Header::default(), children: vec![line("hidden", None)] }],
        };
        assert_eq!(walk(&doc).unwrap().len(), 0);
    }

    #[test]
    fn use_resolves_and_translates() {
        let doc = Element::Svg {
            header: Header::default(),
            children: vec![
                Element::Defs { header: Header::default(), children: vec![line("template", None)] },
                Element::Use {
                    header: Header::default(),
                    href: "#template".to_string(),
                    x: 10.0,
                    y: 0.0,
                },
            ],
        };
        let leaves = walk(&doc).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].0.apply(V2::new(0.0, 0.0)), V2::new(10.0, 0.0));
    }

    #[test]
    fn unresolved_use_is_fatal() {
        let doc = Element::Svg {
            header: Header::default(),
            children: vec![Element::Use { header: Header::default(), href: "#missing".to_string(), x: 0.0, y: 0.0 }],
        };
        assert!(matches!(walk(&doc), Err(WalkError::UnresolvedUse(id)) if id == "missing"));
    }

    #[test]
    fn use_cycle_is_detected() {
        let doc = Element::Svg {
            header: Header::default(),
            children: vec![Element::Use {
                header: Header { id: Some("a".to_string()), transform: None },
                href: "#a".to_string(),
                x: 0.0,
                y: 0.0,
            }],
        };
        assert!(matches!(walk(&doc), Err(WalkError::UseCycle(_))));
    }

    #[test]
    fn text_is_skipped_not_fatal() {
        let doc = Element::Svg {
            header: Header::default(),
            children: vec![Element::Text { header: Header::default() }, line("l1", None)],
        };
        assert_eq!(walk(&doc).unwrap().len(), 1);
    }
}
