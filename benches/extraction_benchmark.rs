//! Product page extraction and price parsing throughput

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use wc_catalogue_scraper_lib::infrastructure::parsing::{DetailParseContext, ProductDetailParser, parse_price};

const PRODUCT_PAGE: &str = r#"
<html><body>
  <div class="woocommerce-product-gallery">
    <div class="woocommerce-product-gallery__image"><a href="/uploads/malbec-1.jpg"><img src="/t1.jpg"></a></div>
    <div class="woocommerce-product-gallery__image"><a href="/uploads/malbec-2.jpg"><img src="/t2.jpg"></a></div>
  </div>
  <h1 class="product_title entry-title">Malbec Reserva 2020</h1>
  <p class="price">
    <del><span class="woocommerce-Price-amount amount"><bdi>$1.556,00</bdi></span></del>
    <ins><span class="woocommerce-Price-amount amount"><bdi>$1.245,50</bdi></span></ins>
  </p>
  <div class="woocommerce-product-details__short-description"><p>Tinto de altura.</p></div>
  <p class="stock in-stock">Disponible</p>
  <div class="product_meta">
    <span class="sku">MB-2020</span>
    <span class="posted_in"><a href="/c/vinos/">Vinos</a>, <a href="/c/tintos/">Tintos</a></span>
  </div>
  <div id="tab-description"><p>Un malbec de Mendoza con crianza en roble.</p></div>
  <dl class="woocommerce-product-attributes">
    <dt>Marca</dt><dd>Catena</dd><dt>País</dt><dd>Argentina</dd>
    <dt>Región</dt><dd>Mendoza</dd><dt>Volumen</dt><dd>750 ml</dd>
  </dl>
</body></html>"#;

fn bench_product_extraction(c: &mut Criterion) {
    let parser = ProductDetailParser::new().expect("default selectors compile");
    let context = DetailParseContext::new("https://panuts.com/producto/malbec-reserva/", "panuts.com");

    c.bench_function("product_page_extraction", |b| {
        b.iter(|| parser.parse_page(black_box(PRODUCT_PAGE), &context))
    });
}

fn bench_price_parsing(c: &mut Criterion) {
    let inputs = ["1,556.00", "1.556,00", "S/. 45", "$ 12,50", "abc", ""];

    c.bench_function("parse_price", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(parse_price(black_box(input)));
            }
        })
    });
}

criterion_group!(benches, bench_product_extraction, bench_price_parsing);
criterion_main!(benches);
