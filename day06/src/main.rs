
use {
    std::collections::hash_map::HashMap,
    anyhow::{anyhow, Result},
    clap::Parser,
    log::info,
    multimap::MultiMap,
};

/// Day 6: Universal Orbit Map
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,
}

type Node = String;
type NodeRef<'a> = &'a str;
type Tree    = MultiMap<Node, Node>;
type InvTree = HashMap<Node, Node>;

fn parse_tree(input: &str) -> Result<Tree> {
    input.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (parent, child) = line.split_once(')')
                .ok_or_else(|| anyhow!("bad orbit {:?}", line))?;
            Ok((parent.to_string(), child.to_string()))
        })
        .collect()
}

// sum of depths of every node below `node`
fn descend(tree: &Tree, node: NodeRef, depth: u32) -> u32 {
    depth + if let Some(children) = tree.get_vec(node) {
        children.iter().map(|child| descend(tree, child, depth+1)).sum::<u32>()
    }
    else {
        0
    }
}

fn lineage<'a>(invtree: &'a InvTree, mut node: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut line = Vec::new();
    while let Some(parent) = invtree.get(node) {
        line.push(parent.as_str());
        node = parent.as_str();
    }
    line
}

fn nearest_common<'a>(
    invtree: &'a InvTree,
    a: NodeRef<'a>,
    b: NodeRef<'a>)
    -> Option<(NodeRef<'a>, usize, usize)>
{
    let line_a = lineage(invtree, a);
    let line_b = lineage(invtree, b);

    line_a.iter()
        .enumerate()
        .find_map(|(dist_a, ancestor_a)| {
            line_b.iter()
                .position(|ancestor_b| ancestor_b == ancestor_a)
                .map(|dist_b| (*ancestor_a, dist_a, dist_b))
        })
}

fn invert_tree(tree: &Tree) -> InvTree {
    let mut invtree = InvTree::new();
    for (parent, children) in tree.iter_all() {
        for child in children.iter() {
            invtree.insert(child.clone(), parent.clone());
        }
    }
    invtree
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let tree = parse_tree(&input)?;
    info!("{} bodies with satellites", tree.len());

    let total_orbits = descend(&tree, "COM", 0);
    println!("Part 1: {} total orbits", total_orbits);

    let invtree = invert_tree(&tree);
    for body in ["YOU", "SAN"] {
        if !invtree.contains_key(body) {
            return Err(anyhow!("{} isn't orbiting anything", body));
        }
    }
    let (via, dist_a, dist_b) = nearest_common(&invtree, "YOU", "SAN")
        .ok_or_else(|| anyhow!("YOU and SAN share no ancestor"))?;
    println!("Part 2: {} transfers (via {})", dist_a + dist_b, via);

    Ok(())
}
