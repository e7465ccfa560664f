use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mosaic_parser::{parse, prettify, serialize};

const NEWSLETTER: &str = r#"
<table width="600" cellpadding="0" cellspacing="0" border="0" align="center">
  <tr>
    <td style="padding: 24px; background-color: #1a73e8;">
      <h1 style="color: #ffffff; font-size: 24px;">Monthly Update</h1>
    </td>
  </tr>
  <tr>
    <td style="padding: 24px;">
      <p>Hello &amp; welcome to this month&#39;s issue.</p>
      <img src="https://example.com/hero.png" alt="Hero" width="552">
      <a href="https://example.com" style="display: inline-block; padding: 12px 24px;">Read more</a>
    </td>
  </tr>
</table>
"#;

fn parse_newsletter(c: &mut Criterion) {
    c.bench_function("parse_newsletter", |b| b.iter(|| parse(black_box(NEWSLETTER))));
}

fn serialize_newsletter(c: &mut Criterion) {
    let fragment = parse(NEWSLETTER);
    c.bench_function("serialize_newsletter", |b| {
        b.iter(|| serialize(black_box(&fragment.nodes)))
    });
}

fn prettify_newsletter(c: &mut Criterion) {
    let markup = serialize(&parse(NEWSLETTER).nodes);
    c.bench_function("prettify_newsletter", |b| b.iter(|| prettify(black_box(&markup))));
}

criterion_group!(
    benches,
    parse_newsletter,
    serialize_newsletter,
    prettify_newsletter
);
criterion_main!(benches);
